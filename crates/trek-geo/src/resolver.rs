//! Geolocation fallback chain.
//!
//! Device fix first, then IP lookup, then the configured default. Each source
//! is tried at most once and strictly in order. Failures of either source are
//! compensated by the next step and never surface as errors; the only thing
//! reported back is the informational `CapabilityUnavailable` notice.

use std::sync::Arc;

use trek_core::LocationError;

use crate::device::DeviceGeolocation;
use crate::ip::IpGeolocation;
use crate::types::{Coordinate, ResolverSettings};

/// Where the resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Device,
    Ip,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub coordinate: Coordinate,
    pub source: ResolutionSource,
    /// Set when the device has no positioning capability at all.
    pub notice: Option<LocationError>,
}

/// `Idle → ResolvingDevice → {ResolvingByIp → Resolved} | Resolved`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResolverState {
    #[default]
    Idle,
    ResolvingDevice,
    ResolvingByIp,
    Resolved(Resolution),
}

enum DeviceOutcome {
    Adopted(Coordinate),
    /// A valid fix outside the region. Terminal: keep the default.
    OutOfRegion(Coordinate),
    Fallback(LocationError),
}

pub struct GeolocationResolver {
    device: Arc<dyn DeviceGeolocation>,
    ip: Arc<dyn IpGeolocation>,
    settings: ResolverSettings,
    state: ResolverState,
}

impl GeolocationResolver {
    pub fn new(
        device: Arc<dyn DeviceGeolocation>,
        ip: Arc<dyn IpGeolocation>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            device,
            ip,
            settings,
            state: ResolverState::Idle,
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// True between the start of `resolve` and its completion.
    pub fn is_resolving(&self) -> bool {
        matches!(
            self.state,
            ResolverState::ResolvingDevice | ResolverState::ResolvingByIp
        )
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            ResolverState::Resolved(r) => Some(r),
            _ => None,
        }
    }

    /// Run the fallback chain to completion. Always yields a coordinate.
    pub async fn resolve(&mut self) -> Resolution {
        self.transition(ResolverState::ResolvingDevice);

        let mut notice = None;

        if self.device.is_available() {
            match self.try_device().await {
                DeviceOutcome::Adopted(fix) => {
                    return self.finish(fix, ResolutionSource::Device, None);
                }
                DeviceOutcome::OutOfRegion(fix) => {
                    tracing::info!(
                        "Device location {} outside region, using default",
                        fix.format()
                    );
                    return self.finish(
                        self.settings.default_coordinate,
                        ResolutionSource::Default,
                        None,
                    );
                }
                DeviceOutcome::Fallback(reason) => {
                    tracing::warn!("Device geolocation failed ({}), trying IP lookup", reason);
                }
            }
        } else {
            tracing::warn!("Device geolocation unavailable, trying IP lookup");
            notice = Some(LocationError::CapabilityUnavailable);
        }

        self.transition(ResolverState::ResolvingByIp);

        match self.try_ip().await {
            Some(coordinate) => self.finish(coordinate, ResolutionSource::Ip, notice),
            None => self.finish(
                self.settings.default_coordinate,
                ResolutionSource::Default,
                notice,
            ),
        }
    }

    async fn try_device(&self) -> DeviceOutcome {
        let options = self.settings.device_options;

        let fix = match tokio::time::timeout(
            options.timeout,
            self.device.current_position(&options),
        )
        .await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => return DeviceOutcome::Fallback(e),
            Err(_) => return DeviceOutcome::Fallback(LocationError::Timeout),
        };

        if !fix.is_usable_fix() {
            tracing::debug!("Device returned invalid coordinates {:?}", fix);
            return DeviceOutcome::Fallback(LocationError::PositionUnavailable);
        }

        if self.settings.bounds.contains(&fix) {
            DeviceOutcome::Adopted(fix)
        } else {
            DeviceOutcome::OutOfRegion(fix)
        }
    }

    /// `None` means "keep the default"; IP failures are deliberately silent.
    async fn try_ip(&self) -> Option<Coordinate> {
        let location = match self.ip.lookup().await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!("IP geolocation failed: {}", e);
                return None;
            }
        };

        if !location.is_in_country(&self.settings.target_country) {
            tracing::info!(
                "IP location not in {}, using default",
                self.settings.target_country
            );
            return None;
        }

        match location.coordinate() {
            Some(c) if c.is_usable_fix() && self.settings.bounds.contains(&c) => Some(c),
            other => {
                tracing::info!("IP location {:?} not usable, using default", other);
                None
            }
        }
    }

    fn finish(
        &mut self,
        coordinate: Coordinate,
        source: ResolutionSource,
        notice: Option<LocationError>,
    ) -> Resolution {
        let resolution = Resolution {
            coordinate,
            source,
            notice,
        };
        tracing::info!(
            "Resolved location {} via {:?}",
            coordinate.format(),
            source
        );
        self.transition(ResolverState::Resolved(resolution.clone()));
        resolution
    }

    fn transition(&mut self, next: ResolverState) {
        tracing::debug!("Resolver {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{FixedDeviceGeolocation, NoDeviceGeolocation};
    use crate::ip::IpLocation;
    use crate::types::PositionOptions;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use trek_core::NetworkError;

    struct FakeIp {
        response: Result<IpLocation, ()>,
        calls: AtomicUsize,
    }

    impl FakeIp {
        fn answering(lat: f64, lon: f64, country: &str) -> Arc<Self> {
            Self::with(IpLocation {
                latitude: Some(lat),
                longitude: Some(lon),
                country: Some(country.to_string()),
            })
        }

        fn with(location: IpLocation) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(location),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IpGeolocation for FakeIp {
        async fn lookup(&self) -> Result<IpLocation, NetworkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(|_| NetworkError::ConnectionFailed("offline".to_string()))
        }
    }

    struct FailingDevice(LocationError);

    #[async_trait]
    impl DeviceGeolocation for FailingDevice {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinate, LocationError> {
            Err(self.0.clone())
        }
    }

    struct HangingDevice;

    #[async_trait]
    impl DeviceGeolocation for HangingDevice {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinate, LocationError> {
            std::future::pending().await
        }
    }

    /// Remembers the options of the last request and answers with a fix.
    struct RecordingDevice {
        fix: Coordinate,
        seen: Mutex<Option<PositionOptions>>,
    }

    #[async_trait]
    impl DeviceGeolocation for RecordingDevice {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(
            &self,
            options: &PositionOptions,
        ) -> Result<Coordinate, LocationError> {
            *self.seen.lock().unwrap() = Some(*options);
            Ok(self.fix)
        }
    }

    fn resolver(device: Arc<dyn DeviceGeolocation>, ip: Arc<FakeIp>) -> GeolocationResolver {
        GeolocationResolver::new(device, ip, ResolverSettings::default())
    }

    fn fixed(lat: f64, lon: f64) -> Arc<dyn DeviceGeolocation> {
        Arc::new(FixedDeviceGeolocation::new(Coordinate::new(lat, lon)))
    }

    #[tokio::test]
    async fn in_region_device_fix_is_adopted() {
        let ip = FakeIp::failing();
        let mut r = resolver(fixed(28.2096, 83.9856), ip.clone());

        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::new(28.2096, 83.9856));
        assert_eq!(res.source, ResolutionSource::Device);
        assert_eq!(res.notice, None);
        assert_eq!(ip.calls(), 0);
        assert!(!r.is_resolving());
    }

    #[tokio::test]
    async fn device_is_asked_for_fresh_high_accuracy_fix() {
        let device = Arc::new(RecordingDevice {
            fix: Coordinate::new(27.7172, 85.3240),
            seen: Mutex::new(None),
        });
        let mut r = resolver(device.clone(), FakeIp::failing());

        let res = r.resolve().await;
        assert_eq!(res.source, ResolutionSource::Device);

        let options = device.seen.lock().unwrap().expect("device was not asked");
        assert!(options.high_accuracy);
        assert_eq!(options.maximum_age, Duration::ZERO);
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn out_of_region_device_fix_keeps_default_without_ip() {
        let ip = FakeIp::answering(28.0, 84.0, "NP");
        for (lat, lon) in [(51.5074, -0.1278), (25.9, 85.0), (28.0, 89.5), (40.7, 74.0)] {
            let mut r = resolver(fixed(lat, lon), ip.clone());
            let res = r.resolve().await;
            assert_eq!(res.coordinate, Coordinate::KATHMANDU);
            assert_eq!(res.source, ResolutionSource::Default);
        }
        assert_eq!(ip.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_device_fix_falls_back_to_ip() {
        for (lat, lon) in [(0.0, 85.0), (27.0, 0.0), (f64::NAN, 85.0)] {
            let ip = FakeIp::answering(27.6710, 85.4298, "NP");
            let mut r = resolver(fixed(lat, lon), ip.clone());
            let res = r.resolve().await;
            assert_eq!(res.coordinate, Coordinate::new(27.6710, 85.4298));
            assert_eq!(res.source, ResolutionSource::Ip);
            assert_eq!(ip.calls(), 1);
        }
    }

    #[tokio::test]
    async fn denied_device_falls_back_silently() {
        let ip = FakeIp::answering(27.5291, 84.3542, "NP");
        let mut r = resolver(
            Arc::new(FailingDevice(LocationError::PermissionDenied)),
            ip.clone(),
        );
        let res = r.resolve().await;
        assert_eq!(res.source, ResolutionSource::Ip);
        assert_eq!(res.notice, None);
    }

    #[tokio::test]
    async fn missing_capability_reports_notice_and_uses_ip() {
        let ip = FakeIp::answering(27.4833, 83.2767, "NP");
        let mut r = resolver(Arc::new(NoDeviceGeolocation), ip.clone());
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::new(27.4833, 83.2767));
        assert_eq!(res.notice, Some(LocationError::CapabilityUnavailable));
        assert_eq!(ip.calls(), 1);
        assert_eq!(r.resolution(), Some(&res));
    }

    #[tokio::test]
    async fn missing_capability_and_ip_failure_yield_default() {
        let ip = FakeIp::failing();
        let mut r = resolver(Arc::new(NoDeviceGeolocation), ip.clone());
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::KATHMANDU);
        assert_eq!(res.source, ResolutionSource::Default);
        assert_eq!(res.notice, Some(LocationError::CapabilityUnavailable));
        assert!(matches!(r.state(), ResolverState::Resolved(_)));
    }

    #[tokio::test]
    async fn ip_outside_country_keeps_default() {
        let ip = FakeIp::answering(28.6139, 77.2090, "IN");
        let mut r = resolver(Arc::new(NoDeviceGeolocation), ip);
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::KATHMANDU);
        assert_eq!(res.source, ResolutionSource::Default);
    }

    #[tokio::test]
    async fn ip_in_country_but_out_of_bounds_keeps_default() {
        let ip = FakeIp::answering(35.0, 85.0, "NP");
        let mut r = resolver(Arc::new(NoDeviceGeolocation), ip);
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::KATHMANDU);
    }

    #[tokio::test]
    async fn ip_country_without_coordinates_keeps_default() {
        let ip = FakeIp::with(IpLocation {
            latitude: None,
            longitude: None,
            country: Some("NP".to_string()),
        });
        let mut r = resolver(Arc::new(NoDeviceGeolocation), ip.clone());
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::KATHMANDU);
        assert_eq!(res.source, ResolutionSource::Default);
        assert_eq!(ip.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_device_times_out_then_uses_ip() {
        let ip = FakeIp::answering(28.2096, 83.9856, "NP");
        let mut r = resolver(Arc::new(HangingDevice), ip.clone());

        let res = r.resolve().await;
        assert_eq!(res.source, ResolutionSource::Ip);
        assert_eq!(ip.calls(), 1);
    }

    #[tokio::test]
    async fn custom_default_and_bounds() {
        let settings = ResolverSettings {
            default_coordinate: Coordinate::new(28.2096, 83.9856),
            device_options: PositionOptions {
                timeout: Duration::from_millis(50),
                ..PositionOptions::default()
            },
            ..ResolverSettings::default()
        };
        let mut r = GeolocationResolver::new(fixed(48.8566, 2.3522), FakeIp::failing(), settings);
        let res = r.resolve().await;
        assert_eq!(res.coordinate, Coordinate::new(28.2096, 83.9856));
    }

    #[test]
    fn starts_idle() {
        let r = resolver(Arc::new(NoDeviceGeolocation), FakeIp::failing());
        assert_eq!(r.state(), &ResolverState::Idle);
        assert!(r.resolution().is_none());
    }
}
