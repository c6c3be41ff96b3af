//! Place search form state.

use thiserror::Error;
use trek_core::SearchConfig;
use trek_geo::{find_popular, Coordinate};

use crate::types::{Category, SearchParameters};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Editable search parameters. Every edit is applied immediately and
/// `submission` hands out a frozen copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryForm {
    params: SearchParameters,
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form defaults from the `[search]` config table. The coordinate keeps
    /// its built-in default until detection runs.
    pub fn from_config(config: &SearchConfig) -> Self {
        let category = config.category.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown default category '{}', using restaurant",
                config.category
            );
            Category::default()
        });

        Self {
            params: SearchParameters {
                radius_in_km: config.radius_in_km,
                category,
                min_rating: config.min_rating,
                max_distance: config.max_distance,
                ..SearchParameters::default()
            },
        }
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.params.set_coordinate(coordinate);
    }

    /// Apply one edit by JSON field name. Empty input reads as 0.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        match name {
            "category" => {
                self.params.category = raw.parse()?;
            }
            "latitude" => self.params.latitude = parse_number("latitude", raw)?,
            "longitude" => self.params.longitude = parse_number("longitude", raw)?,
            "radiusInKm" => self.params.radius_in_km = parse_number("radiusInKm", raw)?,
            "minRating" => self.params.min_rating = parse_number("minRating", raw)?,
            "maxDistance" => self.params.max_distance = parse_number("maxDistance", raw)?,
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Jump to a popular location. Only latitude and longitude change.
    pub fn select_location(&mut self, name: &str) -> bool {
        match find_popular(name) {
            Some(location) => {
                tracing::debug!("Selected popular location {}", location.name);
                self.set_coordinate(location.coordinate);
                true
            }
            None => false,
        }
    }

    pub fn submission(&self) -> SearchParameters {
        self.params.clone()
    }

    /// Values outside the input hints. Informational only.
    pub fn advisories(&self) -> Vec<String> {
        let p = &self.params;
        let mut notes = Vec::new();

        if !p.coordinate().is_on_earth() {
            notes.push(format!(
                "Coordinate {} is outside the valid range",
                p.coordinate().format()
            ));
        }
        if p.radius_in_km < 0.0 {
            notes.push("Search radius should not be negative".to_string());
        }
        if !(0.0..=5.0).contains(&p.min_rating) {
            notes.push("Minimum rating should be between 0 and 5".to_string());
        }
        if p.max_distance < 0.0 {
            notes.push("Maximum distance should not be negative".to_string());
        }
        notes
    }
}

/// Parse numeric form input. Empty input reads as 0; non-finite values are rejected.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
