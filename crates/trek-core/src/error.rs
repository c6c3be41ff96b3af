//! Centralized error types for TrekSathi.
//!
//! This module provides a typed error hierarchy that:
//! - Separates silent fallbacks (geolocation) from user-visible failures (queries)
//! - Provides user-friendly messages suitable for banner display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for the error banner.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Post error: {0}")]
    Post(#[from] PostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Post(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    /// Non-2xx response. `message` is the server-supplied message when the
    /// endpoint propagates one, otherwise a generic failure text.
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection.".to_string()
            }
            NetworkError::Timeout => "The request timed out. Please try again.".to_string(),
            NetworkError::ServerError { message, .. } => message.clone(),
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again.".to_string()
            }
        }
    }

    /// HTTP status of a server error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Positioning errors raised by device geolocation.
///
/// Inside the resolver these are swallowed and compensated by the fallback
/// chain; only `CapabilityUnavailable` is ever reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation capability unavailable")]
    CapabilityUnavailable,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::CapabilityUnavailable => "Geolocation is not supported on this device.",
            _ => "Error accessing your location. Please enable location services.",
        }
    }

    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, LocationError::CapabilityUnavailable)
    }
}

/// Post composition errors.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Description is {len} characters, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Image is {size} bytes, limit is {max}")]
    ImageTooLarge { size: u64, max: u64 },

    #[error("Unsupported image file: {0}")]
    UnsupportedImage(String),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

impl PostError {
    pub fn user_message(&self) -> String {
        match self {
            PostError::MissingField(field) => format!("Please fill in the {} field.", field),
            PostError::DescriptionTooLong { max, .. } => {
                format!("Description must be at most {} characters.", max)
            }
            PostError::ImageTooLarge { .. } => "Image size should be less than 5MB".to_string(),
            PostError::UnsupportedImage(_) => "Please choose an image file.".to_string(),
            PostError::Io(_) => "Could not read the selected image.".to_string(),
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
