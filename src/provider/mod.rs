//! Upstream weather provider
//!
//! The [`WeatherProvider`] trait is the seam between the request pipeline and
//! the network. [`openweather::OpenWeatherClient`] is the production
//! implementation; the payload types below are the subset of the provider's
//! wire format the pipeline consumes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::models::{Coordinates, PlaceQuery};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Identifies the data source on every response
pub const PROVIDER_NAME: &str = "OpenWeatherMap";

/// Single upstream provider exposing geocoding, current weather, forecast and
/// air pollution.
///
/// Every call is independent and stateless; implementations must not retry.
/// Failures are reported as [`crate::WeatherError::Upstream`].
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Geocode a place, best match only
    async fn geocode(&self, place: &PlaceQuery, api_key: &str) -> Result<Vec<GeocodedPlace>>;

    async fn current_conditions(
        &self,
        coord: Coordinates,
        api_key: &str,
    ) -> Result<CurrentConditions>;

    async fn forecast(&self, coord: Coordinates, api_key: &str) -> Result<ForecastPayload>;

    /// First entry of the air-pollution list
    async fn air_quality(&self, coord: Coordinates, api_key: &str) -> Result<PollutionSample>;
}

/// Geocoder match
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl GeocodedPlace {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConditionText {
    pub description: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Wind {
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Current-weather payload
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    pub coord: Coordinates,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
}

/// Forecast payload, entries in upstream order
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ForecastPayload {
    pub city: ForecastCity,
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PollutionIndex {
    pub aqi: u8,
}

/// One air-pollution reading
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PollutionSample {
    pub main: PollutionIndex,
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PollutionPayload {
    #[serde(default)]
    pub list: Vec<PollutionSample>,
}

/// First condition description, or "Unknown" when upstream sent none
pub(crate) fn first_description(weather: &[ConditionText]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}
