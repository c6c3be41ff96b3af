//! Location resolution for TrekSathi
//!
//! Works out where the user is from the device, then their IP address, then a
//! configured default, and keeps the table of popular destinations.

pub mod device;
pub mod ip;
pub mod places;
pub mod resolver;
pub mod types;

pub use device::{DeviceGeolocation, FixedDeviceGeolocation, NoDeviceGeolocation};
pub use ip::{HttpIpGeolocation, IpGeolocation, IpLocation};
pub use places::{find_popular, PopularLocation, POPULAR_LOCATIONS};
pub use resolver::{GeolocationResolver, Resolution, ResolutionSource, ResolverState};
pub use types::*;
