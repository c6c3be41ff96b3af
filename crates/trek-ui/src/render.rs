//! Plain-text rendering of screen content.
//!
//! Every backend field is optional on the wire, so nothing here assumes a
//! value is present. Missing scalars render as `--`.

use std::fmt::Write;

use trek_geo::POPULAR_LOCATIONS;
use trek_services::{AddressRecord, PlaceRecord, Post, ResultSet, WeatherSnapshot};

pub const DETECTING_MESSAGE: &str = "Detecting your location...";
pub const NO_PLACES_MESSAGE: &str =
    "No nearby places found. Try adjusting your search parameters.";
pub const NO_DESCRIPTION: &str = "No description available";

const MISSING: &str = "--";

fn or_missing(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn text_or_missing(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or(MISSING)
}

fn join_present(parts: &[Option<&String>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn banner(message: &str) -> String {
    format!("[!] {}", message)
}

/// `road, city` / `state, country` / `postalCode`, skipping absent parts.
pub fn address(record: &AddressRecord) -> String {
    let lines = [
        join_present(&[record.road.as_ref(), record.city.as_ref()]),
        join_present(&[record.state.as_ref(), record.country.as_ref()]),
        join_present(&[record.postal_code.as_ref()]),
    ];
    lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn place(record: &PlaceRecord) -> String {
    let mut out = record.name.clone();

    if let Some(rating) = record.rating.filter(|r| *r > 0.0) {
        let _ = write!(out, "  ★ {}", rating);
    }
    out.push('\n');

    let description = record
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);
    let _ = writeln!(out, "  {}", description);
    let _ = writeln!(out, "  Category: {}", text_or_missing(record.category.as_deref()));

    match record.distance_in_km {
        Some(d) => {
            let _ = writeln!(out, "  Distance: {:.2} km", d);
        }
        None => {
            let _ = writeln!(out, "  Distance: {} km", MISSING);
        }
    }

    if let Some(hours) = record.open_hours.as_ref().filter(|h| h.is_present()) {
        let _ = writeln!(out, "  Hours: {}", hours);
    }
    if let Some(fee) = record.entry_fee.as_ref().filter(|f| f.is_present()) {
        let _ = writeln!(out, "  Entry Fee: {}", fee);
    }
    out
}

/// Full place-search result. An empty place list renders the "no places"
/// message instead of an empty section.
pub fn results(result: &ResultSet) -> String {
    let mut out = String::new();

    if let Some(record) = &result.address {
        out.push_str("Current Location\n");
        let text = address(record);
        if !text.is_empty() {
            out.push_str(&text);
            out.push('\n');
        }
        out.push('\n');
    }

    let places = result.places();
    if places.is_empty() {
        out.push_str(NO_PLACES_MESSAGE);
        out.push('\n');
        return out;
    }

    out.push_str("Nearby Places\n");
    for record in places {
        out.push('\n');
        out.push_str(&place(record));
    }
    out
}

pub fn weather(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::from("Current Weather\n");

    let _ = writeln!(out, "  {}°C", or_missing(snapshot.temperature));
    let _ = writeln!(
        out,
        "  {}",
        text_or_missing(snapshot.weather_description.as_deref())
    );
    let _ = writeln!(out, "  Humidity:   {}%", or_missing(snapshot.humidity));
    let _ = writeln!(out, "  Wind Speed: {} km/h", or_missing(snapshot.wind_speed));
    let _ = writeln!(out, "  Pressure:   {} hPa", or_missing(snapshot.pressure));
    let _ = writeln!(out, "  Visibility: {} km", or_missing(snapshot.visibility));

    if let Some(forecast) = &snapshot.forecast {
        out.push_str("\n5-Day Forecast\n");
        for day in forecast {
            let _ = writeln!(
                out,
                "  {}  {}°/{}°  {}",
                text_or_missing(day.date.as_deref()),
                or_missing(day.temp_high),
                or_missing(day.temp_low),
                text_or_missing(day.condition.as_deref())
            );
        }
    }
    out
}

pub fn post(post: &Post) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {}", post.title, post.location);
    let _ = writeln!(
        out,
        "  by {} on {}",
        post.author,
        post.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "  {}", post.description);
    if post.image.is_some() {
        out.push_str("  [image attached]\n");
    }
    let _ = writeln!(
        out,
        "  {} likes, {} comments",
        post.likes,
        post.comments.len()
    );
    out
}

pub fn popular_locations() -> String {
    POPULAR_LOCATIONS
        .iter()
        .map(|loc| format!("{:<10} {}", loc.name, loc.coordinate.format()))
        .collect::<Vec<_>>()
        .join("\n")
}
