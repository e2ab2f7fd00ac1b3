//! Air-quality reading

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Air pollution snapshot for a coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualityReading {
    /// Coordinates the reading belongs to; `None` for place-form scaffolds
    pub coord: Option<Coordinates>,
    /// Air Quality Index, 1 = Good .. 5 = Very Poor
    pub aqi: Option<u8>,
    /// Pollutant symbol to concentration in μg/m³
    pub components: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider: String,
}
