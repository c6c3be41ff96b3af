//! Device positioning capability.
//!
//! The resolver only sees the `DeviceGeolocation` trait, so tests and
//! front ends can plug in whatever positioning source they have.

use async_trait::async_trait;
use std::sync::Arc;
use trek_core::{DeviceFixConfig, LocationError};

use crate::types::{Coordinate, PositionOptions};

#[async_trait]
pub trait DeviceGeolocation: Send + Sync {
    /// Whether this device can produce a position at all.
    fn is_available(&self) -> bool;

    /// Request a single fix. Callers bound the wait themselves; implementations
    /// may also honour `options.timeout`.
    async fn current_position(&self, options: &PositionOptions)
        -> Result<Coordinate, LocationError>;
}

/// A device without any positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeviceGeolocation;

#[async_trait]
impl DeviceGeolocation for NoDeviceGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        Err(LocationError::CapabilityUnavailable)
    }
}

/// A device that always reports the same fix (from configuration or the command line).
#[derive(Debug, Clone, Copy)]
pub struct FixedDeviceGeolocation {
    fix: Coordinate,
}

impl FixedDeviceGeolocation {
    pub fn new(fix: Coordinate) -> Self {
        Self { fix }
    }
}

impl From<DeviceFixConfig> for FixedDeviceGeolocation {
    fn from(config: DeviceFixConfig) -> Self {
        Self::new(Coordinate::new(config.latitude, config.longitude))
    }
}

#[async_trait]
impl DeviceGeolocation for FixedDeviceGeolocation {
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        Ok(self.fix)
    }
}

/// Pick the device source described by configuration.
pub fn from_config(fix: Option<DeviceFixConfig>) -> Arc<dyn DeviceGeolocation> {
    match fix {
        Some(fix) => Arc::new(FixedDeviceGeolocation::from(fix)),
        None => Arc::new(NoDeviceGeolocation),
    }
}

/// Parse a `LAT,LON` pair as given on the command line.
pub fn parse_fix(raw: &str) -> Result<Coordinate, LocationError> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| LocationError::Other(format!("expected LAT,LON, got '{}'", raw)))?;

    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| LocationError::Other(format!("invalid latitude '{}'", lat.trim())))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| LocationError::Other(format!("invalid longitude '{}'", lon.trim())))?;

    Ok(Coordinate::new(latitude, longitude))
}
