//! HTTP client for the TrekSathi backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use trek_core::{ApiConfig, AppError, ConfigError, NetworkError, ReqwestErrorExt};
use url::Url;

use crate::types::{ResultSet, SearchParameters, WeatherSnapshot};

const PLACES_PATH: &str = "api/LocationDetection";
const WEATHER_PATH: &str = "api/Weather";

/// Error text used when the places endpoint gives no message of its own.
pub const PLACES_FAILED: &str = "API request failed";
const WEATHER_FAILED: &str = "Weather API request failed";

/// Backend operations used by the screens. One request per call, no retry.
#[async_trait]
pub trait TravelApi: Send + Sync {
    async fn fetch_places(&self, params: &SearchParameters) -> Result<ResultSet, NetworkError>;

    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, NetworkError>;
}

/// Error body returned by the places endpoint.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TravelApiClient {
    base_url: Url,
    places_url: Url,
    weather_url: Url,
    client: Arc<Client>,
}

impl TravelApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ConfigError::Invalid(format!("API base URL '{}': {}", base_url, e)))?;

        // Url::join drops the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ConfigError::Invalid(format!("API endpoint '{}': {}", path, e)))
        };
        let places_url = join(PLACES_PATH)?;
        let weather_url = join(WEATHER_PATH)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            base_url: base,
            places_url,
            weather_url,
            client: Arc::new(client),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl TravelApi for TravelApiClient {
    #[tracing::instrument(
        skip(self, params),
        fields(category = %params.category, lat = params.latitude, lon = params.longitude),
        level = "info"
    )]
    async fn fetch_places(&self, params: &SearchParameters) -> Result<ResultSet, NetworkError> {
        let response = self
            .client
            .post(self.places_url.clone())
            .json(params)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| PLACES_FAILED.to_string());

            tracing::warn!("Place search failed ({}): {}", status, message);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let result: ResultSet = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        tracing::info!("Fetched {} nearby places", result.places().len());
        Ok(result)
    }

    #[tracing::instrument(skip(self), level = "info")]
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, NetworkError> {
        let response = self
            .client
            .get(self.weather_url.clone())
            .query(&[("lat", latitude), ("lon", longitude)])
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather lookup failed ({})", status);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: WEATHER_FAILED.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))
    }
}
