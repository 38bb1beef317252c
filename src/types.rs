//! Core data types for route tracking.

use chrono::NaiveTime;
use serde::Deserialize;
use std::fmt;

/// Static attributes of an airport as published by the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    /// ICAO code, case-sensitive as supplied by the directory
    pub code: String,
    pub name: String,
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Airport {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) @ {:.4}, {:.4}",
            self.code, self.name, self.country, self.latitude, self.longitude
        )
    }
}

/// Directed route segment between two airports.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEdge {
    /// Great-circle distance in nautical miles
    pub distance_nm: f64,
    /// Callsign of the flight that most recently produced this segment
    pub flight: String,
}

/// Route metadata returned by the resolver for a callsign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    pub callsign: String,
    /// Ordered airport codes: origin, optional transit, destination
    #[serde(default)]
    pub route: Vec<String>,
    /// Resolution timestamp in milliseconds since epoch
    #[serde(default)]
    pub update_time: u64,
    #[serde(default)]
    pub operator_iata: Option<String>,
    #[serde(default)]
    pub flight_number: Option<u32>,
}

impl ResolvedRoute {
    /// Build a route with only callsign and airport codes set.
    pub fn new<S: Into<String>>(callsign: impl Into<String>, route: impl IntoIterator<Item = S>) -> Self {
        Self {
            callsign: callsign.into(),
            route: route.into_iter().map(Into::into).collect(),
            update_time: 0,
            operator_iata: None,
            flight_number: None,
        }
    }
}

/// One flight-position event from the input stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEvent {
    /// Time of day the message was generated (date is not tracked)
    pub time: NaiveTime,
    /// Callsign, if the message carried one
    pub callsign: Option<String>,
}
