use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
    routing::get,
};
use tracing::debug;

use crate::error::FieldViolation;
use crate::models::{AirQualityReading, ForecastSeries, WeatherObservation, WeatherSummary};
use crate::service::WeatherService;
use crate::validation::{CityParams, ForecastParams, LocatorParams};
use crate::{Result, WeatherError};

pub type SharedService = Arc<WeatherService>;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(get_status))
        .route("/weather", get(get_weather))
        .route("/weather/summary", get(get_summary))
        .route("/weather/forecast", get(get_forecast))
        .route("/weather/air-quality", get(get_air_quality))
        .with_state(service)
}

/// Unknown or malformed query strings are reported like any other violation
fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query.map(|Query(params)| params).map_err(|rejection| {
        WeatherError::validation(vec![FieldViolation::new("query", rejection.body_text())])
    })
}

async fn get_status() -> &'static str {
    "Api is running!"
}

async fn get_weather(
    State(service): State<SharedService>,
    query: std::result::Result<Query<CityParams>, QueryRejection>,
) -> Result<Json<WeatherObservation>> {
    let place = query_params(query)?.validate()?;
    Ok(Json(service.current_weather(&place).await?))
}

async fn get_summary(
    State(service): State<SharedService>,
    query: std::result::Result<Query<CityParams>, QueryRejection>,
) -> Result<Json<WeatherSummary>> {
    let place = query_params(query)?.validate()?;
    Ok(Json(service.weather_summary(&place).await?))
}

async fn get_forecast(
    State(service): State<SharedService>,
    query: std::result::Result<Query<ForecastParams>, QueryRejection>,
) -> Result<Json<ForecastSeries>> {
    let request = query_params(query)?.validate()?;
    if let Some(days) = &request.days {
        debug!("Ignoring days={days}, upstream forecast window is fixed");
    }
    Ok(Json(service.forecast(&request.location).await?))
}

async fn get_air_quality(
    State(service): State<SharedService>,
    query: std::result::Result<Query<LocatorParams>, QueryRejection>,
) -> Result<Json<AirQualityReading>> {
    let location = query_params(query)?.validate()?;
    Ok(Json(service.air_quality(&location).await?))
}
