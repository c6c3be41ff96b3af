//! Network (IP address) based geolocation.
//! Uses a no-auth JSON endpoint such as ipapi.co.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use trek_core::{NetworkError, ReqwestErrorExt};

use crate::types::Coordinate;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("TrekSathi/", env!("CARGO_PKG_VERSION"));

/// Fields consumed from the IP geolocation response. Anything may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
}

impl IpLocation {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }

    pub fn is_in_country(&self, code: &str) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(code))
    }
}

#[async_trait]
pub trait IpGeolocation: Send + Sync {
    /// One lookup, no retry.
    async fn lookup(&self) -> Result<IpLocation, NetworkError>;
}

/// reqwest-backed IP geolocation lookup.
#[derive(Debug, Clone)]
pub struct HttpIpGeolocation {
    client: Arc<Client>,
    url: String,
}

impl HttpIpGeolocation {
    pub fn new(url: impl Into<String>) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            client: Arc::new(client),
            url: url.into(),
        })
    }
}

#[async_trait]
impl IpGeolocation for HttpIpGeolocation {
    async fn lookup(&self) -> Result<IpLocation, NetworkError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("IP geolocation returned status {}", status);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: "IP geolocation request failed".to_string(),
            });
        }

        let body: IpLocation = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            country = body.country.as_deref().unwrap_or("?"),
            "IP geolocation answered"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_partial_response_parses() {
        let loc: IpLocation = serde_json::from_str(r#"{"ip": "1.2.3.4", "country": "NP"}"#).unwrap();
        assert!(loc.is_in_country("NP"));
        assert_eq!(loc.coordinate(), None);
    }

    #[test]
    fn test_country_match_is_case_insensitive() {
        let loc = IpLocation {
            latitude: Some(27.7),
            longitude: Some(85.3),
            country: Some("np".to_string()),
        };
        assert!(loc.is_in_country("NP"));
        assert!(!loc.is_in_country("IN"));
        assert_eq!(loc.coordinate(), Some(Coordinate::new(27.7, 85.3)));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "103.10.28.1",
                "city": "Pokhara",
                "country": "NP",
                "latitude": 28.2096,
                "longitude": 83.9856
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ip = HttpIpGeolocation::new(format!("{}/json/", server.uri())).unwrap();
        let loc = ip.lookup().await.unwrap();
        assert_eq!(loc.coordinate(), Some(Coordinate::new(28.2096, 83.9856)));
        assert!(loc.is_in_country("NP"));
    }

    #[tokio::test]
    async fn test_lookup_rate_limited_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let ip = HttpIpGeolocation::new(format!("{}/json/", server.uri())).unwrap();
        let err = ip.lookup().await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let ip = HttpIpGeolocation::new(server.uri()).unwrap();
        let err = ip.lookup().await.unwrap_err();
        assert!(matches!(err, NetworkError::InvalidResponse(_)));
    }
}
