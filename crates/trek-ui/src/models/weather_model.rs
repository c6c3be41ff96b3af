use trek_core::{LocationError, ScreenState};
use trek_geo::{Coordinate, DeviceGeolocation, PositionOptions};
use trek_services::{parse_number, FormError, TravelApi, WeatherSnapshot};

pub const WEATHER_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Weather screen. The coordinate starts at (0, 0) and is filled in either
/// by `locate` or by hand.
#[derive(Debug, Default)]
pub struct WeatherModel {
    latitude: f64,
    longitude: f64,
    banner: Option<String>,
    state: ScreenState<WeatherSnapshot>,
}

impl WeatherModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.latitude = coordinate.latitude;
        self.longitude = coordinate.longitude;
    }

    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        match name {
            "latitude" => self.latitude = parse_number("latitude", raw)?,
            "longitude" => self.longitude = parse_number("longitude", raw)?,
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.state.data()
    }

    pub fn banner(&self) -> Option<&str> {
        self.state.error().or(self.banner.as_deref())
    }

    /// Ask the device for a position once and, if it yields a non-zero
    /// coordinate, fetch the weather there.
    pub async fn locate(&mut self, device: &dyn DeviceGeolocation, api: &dyn TravelApi) {
        if !device.is_available() {
            self.banner = Some(LocationError::CapabilityUnavailable.user_message().to_string());
            return;
        }

        let options = PositionOptions {
            high_accuracy: false,
            ..PositionOptions::default()
        };
        let fix = match tokio::time::timeout(options.timeout, device.current_position(&options))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        };

        match fix {
            Ok(coordinate) => {
                self.set_coordinate(coordinate);
                if self.latitude != 0.0 && self.longitude != 0.0 {
                    self.submit(api).await;
                }
            }
            Err(e) => {
                tracing::warn!("Device location for weather failed: {}", e);
                self.banner = Some(e.user_message().to_string());
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn TravelApi) {
        if !self.state.can_submit() {
            return;
        }

        self.banner = None;
        self.state.begin();

        let outcome = api.fetch_weather(self.latitude, self.longitude).await;
        if let Err(e) = &outcome {
            tracing::error!("Weather lookup failed: {}", e);
        }
        self.state.finish(outcome, WEATHER_FAILED_MESSAGE);
    }
}
