//! Coordinate resolution
//!
//! Turns a place identifier into coordinates through a single geocoding
//! lookup restricted to the best match.

use tracing::debug;

use crate::models::{Coordinates, LocationQuery, PlaceQuery};
use crate::provider::WeatherProvider;
use crate::{Result, WeatherError};

/// Service for resolving location inputs
pub struct CoordinateResolver;

impl CoordinateResolver {
    /// Resolve a validated location into coordinates.
    ///
    /// Coordinate input is passed through untouched; place input goes through
    /// the geocoder.
    pub async fn resolve_location(
        provider: &dyn WeatherProvider,
        api_key: &str,
        location: &LocationQuery,
    ) -> Result<Coordinates> {
        match location {
            LocationQuery::Coordinates(coord) => Ok(*coord),
            LocationQuery::Place(place) => Self::resolve_place(provider, api_key, place).await,
        }
    }

    /// Resolve a place name to coordinates via geocoding
    pub async fn resolve_place(
        provider: &dyn WeatherProvider,
        api_key: &str,
        place: &PlaceQuery,
    ) -> Result<Coordinates> {
        debug!("Geocoding location name: {}", place.geocoding_query());

        let geocoding = provider
            .geocode(place, api_key)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::not_found("City not found"))?;

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            geocoding.name, geocoding.lat, geocoding.lon
        );

        Ok(geocoding.coordinates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{StubProvider, london};

    #[tokio::test]
    async fn test_resolve_place_returns_geocoder_coordinates() {
        let provider = StubProvider {
            places: vec![london()],
            ..StubProvider::default()
        };

        let coord = CoordinateResolver::resolve_place(&provider, "key", &PlaceQuery::new("London"))
            .await
            .unwrap();

        assert_eq!(coord, Coordinates::new(51.5074, -0.1278));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_place_without_match_is_not_found() {
        let provider = StubProvider::default();

        let err = CoordinateResolver::resolve_place(&provider, "key", &PlaceQuery::new("Atlantis"))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::NotFound { .. }));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_coordinates_skip_the_geocoder() {
        let provider = StubProvider::default();
        let input = LocationQuery::Coordinates(Coordinates::new(-33.8688, 151.2093));

        let coord = CoordinateResolver::resolve_location(&provider, "key", &input)
            .await
            .unwrap();

        assert_eq!(coord, Coordinates::new(-33.8688, 151.2093));
        assert_eq!(provider.call_count(), 0);
    }
}
