use trek_core::{NetworkError, ScreenState};
use trek_geo::{GeolocationResolver, Resolution};
use trek_services::{QueryForm, ResultSet, TravelApi, PLACES_FAILED};

pub const PLACES_FAILED_MESSAGE: &str = "Failed to fetch location data. Please try again.";

/// Location detection screen: detect where the user is, edit the search,
/// submit it, show the places found.
#[derive(Debug)]
pub struct LocationDetectionModel {
    form: QueryForm,
    detecting: bool,
    banner: Option<String>,
    state: ScreenState<ResultSet>,
    resolution: Option<Resolution>,
}

impl LocationDetectionModel {
    /// Starts in the detecting state, as the screen does on open.
    pub fn new(form: QueryForm) -> Self {
        Self {
            form,
            detecting: true,
            banner: None,
            state: ScreenState::Idle,
            resolution: None,
        }
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut QueryForm {
        &mut self.form
    }

    pub fn is_detecting(&self) -> bool {
        self.detecting
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn state(&self) -> &ScreenState<ResultSet> {
        &self.state
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.state.data()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Message for the error banner, if any.
    pub fn banner(&self) -> Option<&str> {
        self.state.error().or(self.banner.as_deref())
    }

    /// Run the resolver and move the form to the resolved coordinate.
    pub async fn detect(&mut self, resolver: &mut GeolocationResolver) -> Resolution {
        self.detecting = true;
        let resolution = resolver.resolve().await;

        if let Some(notice) = &resolution.notice {
            self.banner = Some(notice.user_message().to_string());
        }
        self.form.set_coordinate(resolution.coordinate);
        self.resolution = Some(resolution.clone());
        self.detecting = false;
        resolution
    }

    /// Submit the current form. Ignored while a request is in flight.
    pub async fn submit(&mut self, api: &dyn TravelApi) {
        if !self.state.can_submit() {
            tracing::debug!("Place search already in progress");
            return;
        }

        for note in self.form.advisories() {
            tracing::info!("{}", note);
        }

        self.banner = None;
        self.state.begin();

        let outcome = api.fetch_places(&self.form.submission()).await;
        let failure = match &outcome {
            Ok(_) => String::new(),
            Err(e) => {
                tracing::error!("Place search failed: {}", e);
                failure_message(e)
            }
        };
        self.state.finish(outcome, &failure);
    }
}

/// Banner text for a failed search. A server-supplied message is shown;
/// anything else gets the fixed retry text.
fn failure_message(error: &NetworkError) -> String {
    match error {
        NetworkError::ServerError { message, .. }
            if !message.is_empty() && message != PLACES_FAILED =>
        {
            format!("Failed to fetch location data: {}", message)
        }
        _ => PLACES_FAILED_MESSAGE.to_string(),
    }
}

impl Default for LocationDetectionModel {
    fn default() -> Self {
        Self::new(QueryForm::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::FakeApi;
    use std::sync::Arc;
    use trek_geo::{
        Coordinate, FixedDeviceGeolocation, IpGeolocation, IpLocation, NoDeviceGeolocation,
        ResolutionSource, ResolverSettings,
    };

    struct OfflineIp;

    #[async_trait::async_trait]
    impl IpGeolocation for OfflineIp {
        async fn lookup(&self) -> Result<IpLocation, NetworkError> {
            Err(NetworkError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_detect_moves_form_to_device_fix() {
        let mut resolver = GeolocationResolver::new(
            Arc::new(FixedDeviceGeolocation::new(Coordinate::new(28.2096, 83.9856))),
            Arc::new(OfflineIp),
            ResolverSettings::default(),
        );
        let mut model = LocationDetectionModel::default();
        assert!(model.is_detecting());

        let res = model.detect(&mut resolver).await;
        assert_eq!(res.source, ResolutionSource::Device);
        assert!(!model.is_detecting());
        assert_eq!(model.form().params().latitude, 28.2096);
        assert_eq!(model.banner(), None);
    }

    #[tokio::test]
    async fn test_detect_without_capability_sets_banner() {
        let mut resolver = GeolocationResolver::new(
            Arc::new(NoDeviceGeolocation),
            Arc::new(OfflineIp),
            ResolverSettings::default(),
        );
        let mut model = LocationDetectionModel::default();
        model.detect(&mut resolver).await;

        assert_eq!(
            model.banner(),
            Some("Geolocation is not supported on this device.")
        );
        assert_eq!(model.form().params().coordinate(), Coordinate::KATHMANDU);
        assert!(!model.is_detecting());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let api = FakeApi::with_places(ResultSet::default());
        let mut model = LocationDetectionModel::default();
        model.submit(&api).await;

        assert!(!model.is_loading());
        assert!(model.results().is_some());
        assert_eq!(api.place_calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_clears_old_results() {
        let mut model = LocationDetectionModel::default();
        model.submit(&FakeApi::with_places(ResultSet::default())).await;
        assert!(model.results().is_some());

        model.submit(&FakeApi::failing(500)).await;
        assert!(!model.is_loading());
        assert!(model.results().is_none());
        assert_eq!(model.banner(), Some(PLACES_FAILED_MESSAGE));
    }

    #[test]
    fn test_failure_message_prefers_server_text() {
        let server = NetworkError::ServerError {
            status: 400,
            message: "Latitude out of range".to_string(),
        };
        assert_eq!(
            failure_message(&server),
            "Failed to fetch location data: Latitude out of range"
        );

        let generic = NetworkError::ServerError {
            status: 500,
            message: PLACES_FAILED.to_string(),
        };
        assert_eq!(failure_message(&generic), PLACES_FAILED_MESSAGE);
        assert_eq!(failure_message(&NetworkError::Timeout), PLACES_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_submit_clears_notice_banner() {
        let mut resolver = GeolocationResolver::new(
            Arc::new(NoDeviceGeolocation),
            Arc::new(OfflineIp),
            ResolverSettings::default(),
        );
        let mut model = LocationDetectionModel::default();
        model.detect(&mut resolver).await;
        assert!(model.banner().is_some());

        model.submit(&FakeApi::with_places(ResultSet::default())).await;
        assert_eq!(model.banner(), None);
    }
}
