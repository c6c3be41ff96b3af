use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "TREKSATHI_API_URL";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "TREKSATHI_LOG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend travel API
    #[serde(default)]
    pub api: ApiConfig,

    /// Geolocation fallback chain settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Initial values of the place search form
    #[serde(default)]
    pub search: SearchConfig,

    /// Post composer limits
    #[serde(default)]
    pub posts: PostsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; endpoints live under `{base_url}/api/`
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base_url() -> String {
    "https://travelguide-rttu.onrender.com".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Rectangle a detected coordinate must fall inside to be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        // Nepal, approximately
        Self {
            lat_min: 26.0,
            lat_max: 31.0,
            lon_min: 80.0,
            lon_max: 89.0,
        }
    }
}

/// A fixed device position, standing in for a platform positioning service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceFixConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// No-auth IP geolocation endpoint returning `latitude`, `longitude`, `country`
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// ISO 3166-1 alpha-2 code an IP result must report to be adopted
    #[serde(default = "default_target_country")]
    pub target_country: String,

    /// Bounded wait for a device fix, in seconds
    #[serde(default = "default_device_timeout")]
    pub device_timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Used whenever no source yields an acceptable coordinate (Kathmandu)
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    #[serde(default)]
    pub bounds: BoundsConfig,

    /// When absent the device capability is reported as unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_fix: Option<DeviceFixConfig>,
}

fn default_ip_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_target_country() -> String {
    "NP".to_string()
}

fn default_device_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_latitude() -> f64 {
    27.7172
}

fn default_longitude() -> f64 {
    85.3240
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            target_country: default_target_country(),
            device_timeout_seconds: default_device_timeout(),
            high_accuracy: true,
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            bounds: BoundsConfig::default(),
            device_fix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_in_km: f64,
    pub category: String,
    pub min_rating: f64,
    pub max_distance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_in_km: 5.0,
            category: "restaurant".to_string(),
            min_rating: 3.0,
            max_distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsConfig {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,
}

fn default_max_image_bytes() -> u64 {
    5_000_000
}

fn default_max_description_chars() -> usize {
    500
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_description_chars: default_max_description_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config.with_env_overrides())
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings, which the caller
    /// logs once tracing is up. Fails on critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok((config, validation))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);
        self.validate_url(
            &self.geolocation.ip_lookup_url,
            "geolocation.ip_lookup_url",
            &mut result,
        );

        if self.api.timeout_seconds == 0 {
            result.add_error("api.timeout_seconds", "Timeout must be greater than 0");
        } else if self.api.timeout_seconds > 300 {
            result.add_warning("api.timeout_seconds", "Timeout is unusually long (>300s)");
        }

        let geo = &self.geolocation;
        if geo.device_timeout_seconds == 0 {
            result.add_error(
                "geolocation.device_timeout_seconds",
                "Device timeout must be greater than 0",
            );
        }

        if geo.target_country.len() != 2 {
            result.add_warning(
                "geolocation.target_country",
                "Expected a two-letter country code",
            );
        }

        let b = &geo.bounds;
        if b.lat_min >= b.lat_max || b.lon_min >= b.lon_max {
            result.add_error("geolocation.bounds", "Bounds minimum must be below maximum");
        }
        if !(-90.0..=90.0).contains(&b.lat_min) || !(-90.0..=90.0).contains(&b.lat_max) {
            result.add_error("geolocation.bounds", "Latitude bounds must lie in -90..=90");
        }
        if !(-180.0..=180.0).contains(&b.lon_min) || !(-180.0..=180.0).contains(&b.lon_max) {
            result.add_error("geolocation.bounds", "Longitude bounds must lie in -180..=180");
        }

        if !(b.lat_min..=b.lat_max).contains(&geo.default_latitude)
            || !(b.lon_min..=b.lon_max).contains(&geo.default_longitude)
        {
            result.add_warning(
                "geolocation.default_latitude",
                "Default coordinate lies outside the region bounds",
            );
        }

        if let Some(fix) = &geo.device_fix {
            if !(-90.0..=90.0).contains(&fix.latitude) || !(-180.0..=180.0).contains(&fix.longitude)
            {
                result.add_error("geolocation.device_fix", "Device fix is not a valid coordinate");
            }
        }

        if self.search.category.trim().is_empty() {
            result.add_error("search.category", "Category cannot be empty");
        }
        if !(0.0..=5.0).contains(&self.search.min_rating) {
            result.add_warning("search.min_rating", "Minimum rating is outside 0..=5");
        }

        if self.posts.max_description_chars == 0 {
            result.add_error(
                "posts.max_description_chars",
                "Description limit must be greater than 0",
            );
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            result.add_warning(
                "logging.level",
                format!(
                    "'{}' is not a plain level; it will be used as a filter directive",
                    self.logging.level
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to a file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("treksathi");

        Ok(config_dir.join("config.toml"))
    }
}
