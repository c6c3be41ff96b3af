//! Wire types for the TrekSathi backend. Field names follow the backend JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use trek_geo::Coordinate;

use crate::form::FormError;

/// Kind of place to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Restaurant,
    Hotel,
    Attraction,
    Shopping,
    Nature,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Restaurant,
        Category::Hotel,
        Category::Attraction,
        Category::Shopping,
        Category::Nature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Attraction => "attraction",
            Category::Shopping => "shopping",
            Category::Nature => "nature",
        }
    }

    /// Human-readable label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Restaurant => "Restaurants",
            Category::Hotel => "Hotels",
            Category::Attraction => "Tourist Attractions",
            Category::Shopping => "Shopping",
            Category::Nature => "Nature & Parks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormError::UnknownCategory(s.to_string()))
    }
}

/// Place search request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_in_km: f64,
    pub category: Category,
    pub min_rating: f64,
    pub max_distance: f64,
}

impl SearchParameters {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.latitude = coordinate.latitude;
        self.longitude = coordinate.longitude;
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            latitude: Coordinate::KATHMANDU.latitude,
            longitude: Coordinate::KATHMANDU.longitude,
            radius_in_km: 5.0,
            category: Category::Restaurant,
            min_rating: 3.0,
            max_distance: 10.0,
        }
    }
}

/// Place search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearby_attractions: Option<Vec<PlaceRecord>>,
}

impl ResultSet {
    /// Nearby places, empty when the field is missing.
    pub fn places(&self) -> &[PlaceRecord] {
        self.nearby_attractions.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressRecord {
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub distance_in_km: Option<f64>,
    #[serde(default)]
    pub open_hours: Option<FieldValue>,
    #[serde(default)]
    pub entry_fee: Option<FieldValue>,
}

/// A free-form backend value that may arrive as text or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Empty strings and zero count as "not provided".
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Current conditions plus an optional multi-day forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherSnapshot {
    pub temperature: Option<f64>,
    pub weather_description: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastDay>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastDay {
    pub date: Option<String>,
    pub temp_high: Option<f64>,
    pub temp_low: Option<f64>,
    pub condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_serialization() {
        let json = serde_json::to_value(SearchParameters::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.324,
                "radiusInKm": 5.0,
                "category": "restaurant",
                "minRating": 3.0,
                "maxDistance": 10.0
            })
        );
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Hotel".parse::<Category>().unwrap(), Category::Hotel);
        assert_eq!(" nature ".parse::<Category>().unwrap(), Category::Nature);
        assert!(matches!(
            "museum".parse::<Category>(),
            Err(FormError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_result_set_deserialization() {
        let json = r#"{
            "address": {"road": "Lakeside Rd", "city": "Pokhara", "postalCode": "33700"},
            "nearbyAttractions": [
                {"name": "Phewa Lake", "rating": 4.7, "category": "nature",
                 "distanceInKm": 0.4213, "entryFee": 0, "openHours": "Always open"},
                {"name": "Moondance", "entryFee": "NPR 200"}
            ]
        }"#;
        let result: ResultSet = serde_json::from_str(json).unwrap();
        let address = result.address.as_ref().unwrap();
        assert_eq!(address.city.as_deref(), Some("Pokhara"));
        assert_eq!(address.state, None);
        assert_eq!(result.places().len(), 2);
        assert_eq!(result.places()[0].entry_fee, Some(FieldValue::Number(0.0)));
        assert!(!result.places()[0].entry_fee.as_ref().unwrap().is_present());
        assert_eq!(
            result.places()[1].entry_fee.as_ref().map(ToString::to_string),
            Some("NPR 200".to_string())
        );
    }

    #[test]
    fn test_empty_result_set() {
        let result: ResultSet = serde_json::from_str("{}").unwrap();
        assert!(result.address.is_none());
        assert!(result.places().is_empty());
    }

    #[test]
    fn test_weather_without_forecast() {
        let json = r#"{"temperature": 18.5, "weatherDescription": "light rain", "humidity": 82}"#;
        let weather: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(weather.temperature, Some(18.5));
        assert_eq!(weather.humidity, Some(82.0));
        assert!(weather.forecast.is_none());
        assert!(weather.visibility.is_none());
    }
}
