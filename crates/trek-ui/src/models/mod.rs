pub mod location_model;
pub mod posts_model;
pub mod weather_model;

pub use location_model::LocationDetectionModel;
pub use posts_model::PostsModel;
pub use weather_model::WeatherModel;

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trek_core::NetworkError;
    use trek_services::{ResultSet, SearchParameters, TravelApi, WeatherSnapshot};

    /// Canned backend. `None` answers with a server error of `status`.
    pub struct FakeApi {
        places: Option<ResultSet>,
        weather: Option<WeatherSnapshot>,
        status: u16,
        place_calls: AtomicUsize,
        weather_calls: AtomicUsize,
    }

    impl FakeApi {
        fn build(places: Option<ResultSet>, weather: Option<WeatherSnapshot>, status: u16) -> Self {
            Self {
                places,
                weather,
                status,
                place_calls: AtomicUsize::new(0),
                weather_calls: AtomicUsize::new(0),
            }
        }

        pub fn with_places(places: ResultSet) -> Self {
            Self::build(Some(places), None, 500)
        }

        pub fn with_weather(weather: WeatherSnapshot) -> Self {
            Self::build(None, Some(weather), 500)
        }

        pub fn failing(status: u16) -> Self {
            Self::build(None, None, status)
        }

        pub fn place_calls(&self) -> usize {
            self.place_calls.load(Ordering::SeqCst)
        }

        pub fn weather_calls(&self) -> usize {
            self.weather_calls.load(Ordering::SeqCst)
        }

        fn error(&self, message: &str) -> NetworkError {
            NetworkError::ServerError {
                status: self.status,
                message: message.to_string(),
            }
        }
    }

    #[async_trait]
    impl TravelApi for FakeApi {
        async fn fetch_places(
            &self,
            _params: &SearchParameters,
        ) -> Result<ResultSet, NetworkError> {
            self.place_calls.fetch_add(1, Ordering::SeqCst);
            self.places
                .clone()
                .ok_or_else(|| self.error("API request failed"))
        }

        async fn fetch_weather(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<WeatherSnapshot, NetworkError> {
            self.weather_calls.fetch_add(1, Ordering::SeqCst);
            self.weather
                .clone()
                .ok_or_else(|| self.error("Weather API request failed"))
        }
    }
}
