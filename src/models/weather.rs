//! Current conditions and the derived summary

use serde::{Deserialize, Serialize};

/// Current weather for a place
///
/// Numeric fields are `None` only in scaffold responses, where they serialize
/// as `null`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Place name as reported by the provider (or as requested, for scaffolds)
    pub city: String,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Condition text, e.g. "light rain"
    pub description: String,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
    /// Atmospheric pressure in hPa
    pub pressure: Option<f64>,
    /// Visibility in meters
    pub visibility: Option<f64>,
    /// Dew point in Celsius, always derived locally
    pub dew_point: Option<f64>,
    /// Data source
    pub provider: String,
}

/// Current weather plus a one-line summary and a clothing recommendation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSummary {
    #[serde(flatten)]
    pub observation: WeatherObservation,
    pub summary: Option<String>,
    pub recommendation: Option<String>,
}
