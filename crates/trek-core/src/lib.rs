pub mod config;
pub mod error;
pub mod screen_state;

pub use config::{
    ApiConfig, BoundsConfig, Config, DeviceFixConfig, GeolocationConfig, LoggingConfig,
    PostsConfig, SearchConfig, ValidationResult,
};
pub use error::{
    AppError, ConfigError, LocationError, NetworkError, PostError, ReqwestErrorExt,
};
pub use screen_state::ScreenState;

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used as the filter.
pub fn init(default_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("TrekSathi core initialized");
    Ok(())
}
