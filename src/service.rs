//! Request pipeline
//!
//! Scaffold short-circuit, coordinate resolution, upstream fetch, derived
//! metrics and response assembly for the four public operations. Each call
//! runs its upstream requests sequentially; nothing is shared between
//! requests except the provider client.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::{CredentialSource, mask_key};
use crate::models::{
    AirQualityReading, ForecastSeries, LocationQuery, PlaceQuery, WeatherObservation,
    WeatherSummary,
};
use crate::provider::WeatherProvider;
use crate::resolver::CoordinateResolver;
use crate::{Result, WeatherError, assembler, scaffold};

/// Weather operations over a single upstream provider
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    credentials: CredentialSource,
    scaffold_fallback: bool,
}

impl WeatherService {
    /// Create a service with scaffold fallback enabled
    pub fn new(provider: Arc<dyn WeatherProvider>, credentials: CredentialSource) -> Self {
        Self {
            provider,
            credentials,
            scaffold_fallback: true,
        }
    }

    /// Toggle scaffold responses for missing credentials
    #[must_use]
    pub fn with_scaffold_fallback(mut self, enabled: bool) -> Self {
        self.scaffold_fallback = enabled;
        self
    }

    /// Whether an API key is available right now
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.current().is_some()
    }

    /// API key for this request; `Ok(None)` selects the scaffold path
    fn api_key(&self) -> Result<Option<String>> {
        match self.credentials.current() {
            Some(key) => {
                debug!("Using API key {}", mask_key(&key));
                Ok(Some(key))
            }
            None if self.scaffold_fallback => {
                warn!("OpenWeatherMap API key not set, answering with scaffold");
                Ok(None)
            }
            None => Err(WeatherError::config("OpenWeatherMap API key not set")),
        }
    }

    /// Current conditions for a place
    #[instrument(skip_all, fields(city = %place.city))]
    pub async fn current_weather(&self, place: &PlaceQuery) -> Result<WeatherObservation> {
        let Some(api_key) = self.api_key()? else {
            return Ok(scaffold::weather(place));
        };

        let coord = CoordinateResolver::resolve_place(self.provider.as_ref(), &api_key, place).await?;
        let current = self.provider.current_conditions(coord, &api_key).await?;
        let observation = assembler::observation(current);

        info!(
            "Current weather for {}: {:?}°C, {}",
            observation.city, observation.temperature, observation.description
        );
        Ok(observation)
    }

    /// Current conditions plus summary and recommendation
    #[instrument(skip_all, fields(city = %place.city))]
    pub async fn weather_summary(&self, place: &PlaceQuery) -> Result<WeatherSummary> {
        if self.api_key()?.is_none() {
            return Ok(scaffold::summary(place));
        }

        let observation = self.current_weather(place).await?;
        Ok(assembler::summary(observation))
    }

    /// Forecast for a place or coordinate pair
    #[instrument(skip_all)]
    pub async fn forecast(&self, location: &LocationQuery) -> Result<ForecastSeries> {
        let Some(api_key) = self.api_key()? else {
            return Ok(scaffold::forecast(location));
        };

        let coord =
            CoordinateResolver::resolve_location(self.provider.as_ref(), &api_key, location).await?;
        let payload = self.provider.forecast(coord, &api_key).await?;

        let echoed = match location {
            LocationQuery::Coordinates(coord) => Some(*coord),
            LocationQuery::Place(_) => None,
        };
        let series = assembler::forecast(payload, echoed);

        info!(
            "Forecast for {} with {} entries",
            coord.format_coordinates(),
            series.len()
        );
        Ok(series)
    }

    /// Air quality for a place or coordinate pair
    #[instrument(skip_all)]
    pub async fn air_quality(&self, location: &LocationQuery) -> Result<AirQualityReading> {
        let Some(api_key) = self.api_key()? else {
            return Ok(scaffold::air_quality(location));
        };

        let coord =
            CoordinateResolver::resolve_location(self.provider.as_ref(), &api_key, location).await?;
        let sample = self.provider.air_quality(coord, &api_key).await?;

        info!(
            "Air quality for {}: AQI {}",
            coord.format_coordinates(),
            sample.main.aqi
        );
        Ok(assembler::air_quality(sample, coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::provider::testing::{
        StubProvider, london, london_current, london_forecast, pollution,
    };
    use crate::scaffold::SCAFFOLD_DESCRIPTION;

    fn stocked() -> Arc<StubProvider> {
        Arc::new(StubProvider {
            places: vec![london()],
            current: Some(london_current()),
            forecast: Some(london_forecast()),
            pollution: Some(pollution()),
            ..StubProvider::default()
        })
    }

    fn service(provider: Arc<StubProvider>, key: Option<&str>) -> WeatherService {
        WeatherService::new(provider, CredentialSource::Fixed(key.map(str::to_string)))
    }

    #[tokio::test]
    async fn test_scaffold_never_calls_upstream() {
        let provider = stocked();
        let service = service(provider.clone(), None);
        let place = PlaceQuery::new("London");
        let coords = LocationQuery::Coordinates(Coordinates::new(51.5074, -0.1278));

        let weather = service.current_weather(&place).await.unwrap();
        assert_eq!(weather.description, SCAFFOLD_DESCRIPTION);
        assert_eq!(weather.temperature, None);

        let summary = service.weather_summary(&place).await.unwrap();
        assert_eq!(summary.summary, None);

        let forecast = service.forecast(&coords).await.unwrap();
        assert_eq!(forecast.forecast, None);
        assert_eq!(forecast.coord, Some(Coordinates::new(51.5074, -0.1278)));

        let air = service.air_quality(&coords).await.unwrap();
        assert_eq!(air.aqi, None);
        assert!(air.components.is_empty());

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let provider = stocked();
        let service = service(provider.clone(), Some(""));
        assert!(!service.has_credentials());

        let weather = service.current_weather(&PlaceQuery::new("London")).await.unwrap();
        assert_eq!(weather.description, SCAFFOLD_DESCRIPTION);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_without_fallback_is_config_error() {
        let service = service(stocked(), None).with_scaffold_fallback(false);
        let err = service
            .current_weather(&PlaceQuery::new("London"))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Config { .. }));
    }

    #[tokio::test]
    async fn test_current_weather_resolves_then_fetches() {
        let provider = stocked();
        let service = service(provider.clone(), Some("test-key"));

        let weather = service.current_weather(&PlaceQuery::new("London")).await.unwrap();

        assert_eq!(weather.city, "London");
        assert_eq!(weather.temperature, Some(18.0));
        assert!(weather.dew_point.is_some());
        assert_eq!(provider.call_count(), 2);
        assert_eq!(
            *provider.requested.lock().unwrap(),
            vec![Coordinates::new(51.5074, -0.1278)]
        );
    }

    #[tokio::test]
    async fn test_summary_adds_texts() {
        let service = service(stocked(), Some("test-key"));
        let summary = service.weather_summary(&PlaceQuery::new("London")).await.unwrap();
        assert_eq!(summary.summary.as_deref(), Some("It's warm and light rain."));
        assert_eq!(
            summary.recommendation.as_deref(),
            Some("A light jacket should be enough.")
        );
    }

    #[tokio::test]
    async fn test_unknown_place_is_not_found() {
        let provider = Arc::new(StubProvider {
            current: Some(london_current()),
            ..StubProvider::default()
        });
        let service = service(provider.clone(), Some("test-key"));

        let err = service
            .current_weather(&PlaceQuery::new("Atlantis"))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::NotFound { .. }));
        // resolution failed, so the data call never happened
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_forecast_coordinates_are_echoed() {
        let provider = stocked();
        let service = service(provider.clone(), Some("test-key"));
        let requested = Coordinates::new(51.5, -0.13);

        let series = service
            .forecast(&LocationQuery::Coordinates(requested))
            .await
            .unwrap();

        assert_eq!(series.coord, Some(requested));
        assert_eq!(series.len(), 2);
        // no geocoding for coordinate input
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_air_quality_for_place_uses_resolved_coordinates() {
        let provider = stocked();
        let service = service(provider.clone(), Some("test-key"));

        let reading = service
            .air_quality(&LocationQuery::Place(PlaceQuery::new("London")))
            .await
            .unwrap();

        assert_eq!(reading.coord, Some(Coordinates::new(51.5074, -0.1278)));
        assert_eq!(reading.aqi, Some(2));
        assert_eq!(reading.components.get("pm2_5"), Some(&0.5));
    }

    #[tokio::test]
    async fn test_air_quality_for_coordinates_echoes_input() {
        let provider = stocked();
        let service = service(provider.clone(), Some("test-key"));
        let requested = Coordinates::new(51.5, -0.13);

        let reading = service
            .air_quality(&LocationQuery::Coordinates(requested))
            .await
            .unwrap();

        assert_eq!(reading.coord, Some(requested));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(*provider.requested.lock().unwrap(), vec![requested]);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let provider = Arc::new(StubProvider {
            places: vec![london()],
            ..StubProvider::default()
        });
        let service = service(provider, Some("test-key"));

        let err = service
            .air_quality(&LocationQuery::Place(PlaceQuery::new("London")))
            .await
            .unwrap_err();

        match err {
            WeatherError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to fetch air quality data");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
