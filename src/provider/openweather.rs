//! OpenWeatherMap API client
//!
//! Async HTTP client for the geocoding, current-weather, forecast and
//! air-pollution endpoints. Every request carries the API key supplied by the
//! caller and is bounded by the configured timeout. No retries are performed:
//! one failed call fails the request.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::{
    CurrentConditions, ForecastPayload, GeocodedPlace, PollutionPayload, PollutionSample,
    WeatherProvider,
};
use crate::config::ProviderConfig;
use crate::models::{Coordinates, PlaceQuery};
use crate::{Result, WeatherError};

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

const GEOCODING_FAILURE: &str = "Failed to resolve city coordinates";
const WEATHER_FAILURE: &str = "Failed to fetch weather data";
const FORECAST_FAILURE: &str = "Failed to fetch forecast data";
const AIR_QUALITY_FAILURE: &str = "Failed to fetch air quality data";

/// Responses slower than this are logged as warnings
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Error body OpenWeatherMap sends with non-2xx answers
#[derive(Debug, Deserialize)]
struct UpstreamFailure {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// OpenWeatherMap API client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    /// HTTP client
    client: Client,
    /// API root, without trailing slash
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client from the provider configuration
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("weather-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// Transport faults and non-2xx answers become [`WeatherError::Upstream`],
    /// keeping the upstream status and message when present and falling back
    /// to 500 and `failure` otherwise.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        api_key: &str,
        failure: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let start_time = Instant::now();

        debug!("OpenWeatherMap request: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|e| {
                let status = e.status().map_or(500, |s| s.as_u16());
                if e.is_timeout() {
                    warn!(
                        "OpenWeatherMap request timed out after {:.3}s",
                        start_time.elapsed().as_secs_f64()
                    );
                } else {
                    warn!("Network error calling OpenWeatherMap: {}", e.without_url());
                }
                WeatherError::upstream(status, failure)
            })?;

        let status = response.status();
        let elapsed = start_time.elapsed();

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            elapsed.as_secs_f64()
        );

        if elapsed > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamFailure>(&body)
                .ok()
                .and_then(|f| f.message)
                .and_then(|m| m.as_str().map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| failure.to_string());

            warn!("OpenWeatherMap answered {}: {}", status, message);
            return Err(WeatherError::upstream(status.as_u16(), message));
        }

        let payload = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse OpenWeatherMap response: {}", e.without_url());
            WeatherError::upstream(500, failure)
        })?;

        info!(
            "Successful API request in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(payload)
    }
}

fn coordinate_query(coord: Coordinates) -> Vec<(&'static str, String)> {
    vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip_all, fields(place = %place.geocoding_query()))]
    async fn geocode(&self, place: &PlaceQuery, api_key: &str) -> Result<Vec<GeocodedPlace>> {
        let query = [("q", place.geocoding_query()), ("limit", "1".to_string())];
        let results: Vec<GeocodedPlace> = self
            .get_json(GEOCODING_PATH, &query, api_key, GEOCODING_FAILURE)
            .await?;

        if results.is_empty() {
            warn!("No results found for location '{}'", place.city);
        } else {
            debug!(
                "Geocoding results: {:?}",
                results
                    .iter()
                    .map(|r| format!("{} ({:.4}, {:.4})", r.name, r.lat, r.lon))
                    .collect::<Vec<_>>()
            );
        }

        Ok(results)
    }

    #[instrument(skip_all, fields(lat = coord.lat, lon = coord.lon))]
    async fn current_conditions(
        &self,
        coord: Coordinates,
        api_key: &str,
    ) -> Result<CurrentConditions> {
        let mut query = coordinate_query(coord);
        query.push(("units", "metric".to_string()));
        self.get_json(CURRENT_WEATHER_PATH, &query, api_key, WEATHER_FAILURE)
            .await
    }

    #[instrument(skip_all, fields(lat = coord.lat, lon = coord.lon))]
    async fn forecast(&self, coord: Coordinates, api_key: &str) -> Result<ForecastPayload> {
        let mut query = coordinate_query(coord);
        query.push(("units", "metric".to_string()));
        let forecast: ForecastPayload = self
            .get_json(FORECAST_PATH, &query, api_key, FORECAST_FAILURE)
            .await?;

        info!("Retrieved forecast with {} data points", forecast.list.len());
        Ok(forecast)
    }

    #[instrument(skip_all, fields(lat = coord.lat, lon = coord.lon))]
    async fn air_quality(&self, coord: Coordinates, api_key: &str) -> Result<PollutionSample> {
        let query = coordinate_query(coord);
        let payload: PollutionPayload = self
            .get_json(AIR_POLLUTION_PATH, &query, api_key, AIR_QUALITY_FAILURE)
            .await?;

        payload.list.into_iter().next().ok_or_else(|| {
            warn!("Air pollution response contained no readings");
            WeatherError::upstream(500, AIR_QUALITY_FAILURE)
        })
    }
}
