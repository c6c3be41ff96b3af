use serde::{Deserialize, Serialize};
use std::time::Duration;

use trek_core::{BoundsConfig, GeolocationConfig};

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Kathmandu, the fallback when no source yields an acceptable coordinate.
    pub const KATHMANDU: Coordinate = Coordinate::new(27.7172, 85.3240);

    /// Finite and within -90..=90 / -180..=180.
    pub fn is_on_earth(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Usable as a positioning result: on earth with neither component zero.
    ///
    /// Positioning sources report a missing component as 0, so a zero is
    /// treated the same as an absent value.
    pub fn is_usable_fix(&self) -> bool {
        self.is_on_earth() && self.latitude != 0.0 && self.longitude != 0.0
    }

    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Inclusive rectangle used to decide whether a detected coordinate is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoRegionBounds {
    /// Approximate bounding box of Nepal.
    pub const NEPAL: GeoRegionBounds = GeoRegionBounds {
        lat_min: 26.0,
        lat_max: 31.0,
        lon_min: 80.0,
        lon_max: 89.0,
    };

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.latitude >= self.lat_min
            && coordinate.latitude <= self.lat_max
            && coordinate.longitude >= self.lon_min
            && coordinate.longitude <= self.lon_max
    }
}

impl Default for GeoRegionBounds {
    fn default() -> Self {
        Self::NEPAL
    }
}

impl From<BoundsConfig> for GeoRegionBounds {
    fn from(b: BoundsConfig) -> Self {
        Self {
            lat_min: b.lat_min,
            lat_max: b.lat_max,
            lon_min: b.lon_min,
            lon_max: b.lon_max,
        }
    }
}

/// Options for a single device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// Upper bound on the wait for a fix.
    pub timeout: Duration,
    /// Oldest cached fix that may be returned; zero demands a fresh one.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// What the resolver needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub default_coordinate: Coordinate,
    pub bounds: GeoRegionBounds,
    pub target_country: String,
    pub device_options: PositionOptions,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_coordinate: Coordinate::KATHMANDU,
            bounds: GeoRegionBounds::NEPAL,
            target_country: "NP".to_string(),
            device_options: PositionOptions::default(),
        }
    }
}

impl From<&GeolocationConfig> for ResolverSettings {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            default_coordinate: Coordinate::new(config.default_latitude, config.default_longitude),
            bounds: config.bounds.into(),
            target_country: config.target_country.clone(),
            device_options: PositionOptions {
                high_accuracy: config.high_accuracy,
                timeout: Duration::from_secs(config.device_timeout_seconds),
                maximum_age: Duration::ZERO,
            },
        }
    }
}
