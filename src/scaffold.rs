//! Credential-free placeholder responses
//!
//! When no API key is configured the pipeline skips resolution and upstream
//! calls and answers with these shapes instead: same fields as the real
//! responses, provider-derived values set to `null`, plus a fixed description.

use std::collections::BTreeMap;

use crate::models::{
    AirQualityReading, ForecastSeries, LocationQuery, PlaceQuery, WeatherObservation,
    WeatherSummary,
};
use crate::provider::PROVIDER_NAME;

pub const SCAFFOLD_DESCRIPTION: &str = "API key missing (scaffold)";

#[must_use]
pub fn weather(place: &PlaceQuery) -> WeatherObservation {
    WeatherObservation {
        city: place.city.clone(),
        temperature: None,
        description: SCAFFOLD_DESCRIPTION.to_string(),
        humidity: None,
        wind_speed: None,
        pressure: None,
        visibility: None,
        dew_point: None,
        provider: PROVIDER_NAME.to_string(),
    }
}

#[must_use]
pub fn summary(place: &PlaceQuery) -> WeatherSummary {
    WeatherSummary {
        observation: weather(place),
        summary: None,
        recommendation: None,
    }
}

/// Echoes the city for place input and the coordinates for coordinate input
#[must_use]
pub fn forecast(location: &LocationQuery) -> ForecastSeries {
    let (city, coord) = match location {
        LocationQuery::Place(place) => (Some(place.city.clone()), None),
        LocationQuery::Coordinates(coord) => (None, Some(*coord)),
    };

    ForecastSeries {
        city,
        coord,
        forecast: None,
        description: Some(SCAFFOLD_DESCRIPTION.to_string()),
        provider: PROVIDER_NAME.to_string(),
    }
}

/// Place input has no coordinates to echo, so `coord` stays `null`
#[must_use]
pub fn air_quality(location: &LocationQuery) -> AirQualityReading {
    let coord = match location {
        LocationQuery::Place(_) => None,
        LocationQuery::Coordinates(coord) => Some(*coord),
    };

    AirQualityReading {
        coord,
        aqi: None,
        components: BTreeMap::new(),
        description: Some(SCAFFOLD_DESCRIPTION.to_string()),
        provider: PROVIDER_NAME.to_string(),
    }
}
