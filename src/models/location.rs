//! Location model: a place identifier or a coordinate pair

use serde::{Deserialize, Serialize};

/// Coordinate pair as exposed on the wire (`{ "lat": .., "lon": .. }`)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Human readable place reference, resolved through the geocoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    /// City name
    pub city: String,
    /// Country code (ISO 3166 alpha-2 or alpha-3)
    pub country: Option<String>,
    /// State, region or oblast
    pub state: Option<String>,
}

impl PlaceQuery {
    /// Create a new place query for a bare city name
    #[must_use]
    pub fn new<S: Into<String>>(city: S) -> Self {
        Self {
            city: city.into(),
            country: None,
            state: None,
        }
    }

    #[must_use]
    pub fn with_country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_state<S: Into<String>>(mut self, state: S) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Geocoder query string: `city[,state][,country]`
    #[must_use]
    pub fn geocoding_query(&self) -> String {
        [Some(&self.city), self.state.as_ref(), self.country.as_ref()]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Validated location input: exactly one of the two forms
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Place name with optional disambiguators
    Place(PlaceQuery),
    /// Coordinates as received from the caller
    Coordinates(Coordinates),
}
