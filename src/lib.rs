//! Weather gateway - HTTP facade over OpenWeatherMap
//!
//! This library validates location queries, resolves places to coordinates,
//! fetches current conditions, forecasts and air quality from the upstream
//! provider and reshapes them into a stable response format.

pub mod api;
pub mod assembler;
pub mod config;
pub mod derived;
pub mod error;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod scaffold;
pub mod service;
pub mod telemetry;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use config::{CredentialSource, GatewayConfig};
pub use error::{FieldViolation, WeatherError};
pub use models::{
    AirQualityReading, Coordinates, ForecastEntry, ForecastSeries, LocationQuery, PlaceQuery,
    WeatherObservation, WeatherSummary,
};
pub use provider::{OpenWeatherClient, WeatherProvider};
pub use resolver::CoordinateResolver;
pub use service::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
