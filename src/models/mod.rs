//! Data models for the weather gateway
//!
//! This module contains the public domain models organized by concern:
//! - Location: place identifiers, coordinates and the validated input union
//! - Weather: current conditions and the derived summary
//! - Forecast: ordered forecast series
//! - Air quality: pollution index and components

pub mod air_quality;
pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::AirQualityReading;
pub use forecast::{ForecastEntry, ForecastSeries};
pub use location::{Coordinates, LocationQuery, PlaceQuery};
pub use weather::{WeatherObservation, WeatherSummary};
