//! Forecast series returned by the forecast endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// One timed forecast step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Unix timestamp as reported upstream
    pub dt: i64,
    /// Same instant in RFC 3339
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Condition text
    pub description: String,
}

/// Ordered forecast for a place, in upstream order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coordinates>,
    /// `None` only in scaffold responses
    pub forecast: Option<Vec<ForecastEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider: String,
}

impl ForecastSeries {
    /// Number of forecast steps, zero for scaffolds
    #[must_use]
    pub fn len(&self) -> usize {
        self.forecast.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
