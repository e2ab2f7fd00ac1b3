//! Mapping from upstream payloads to the public response shapes

use chrono::DateTime;

use crate::derived;
use crate::models::{
    AirQualityReading, Coordinates, ForecastEntry, ForecastSeries, WeatherObservation,
    WeatherSummary,
};
use crate::provider::{
    CurrentConditions, ForecastPayload, PROVIDER_NAME, PollutionSample, first_description,
};

/// Current conditions with the locally derived dew point
#[must_use]
pub fn observation(current: CurrentConditions) -> WeatherObservation {
    let temperature = current.main.temp;
    let dew_point = current
        .main
        .humidity
        .and_then(|humidity| derived::dew_point(temperature, humidity));

    WeatherObservation {
        description: first_description(&current.weather),
        city: current.name,
        temperature: Some(temperature),
        humidity: current.main.humidity,
        wind_speed: current.wind.speed,
        pressure: current.main.pressure,
        visibility: current.visibility,
        dew_point,
        provider: PROVIDER_NAME.to_string(),
    }
}

#[must_use]
pub fn summary(observation: WeatherObservation) -> WeatherSummary {
    let (summary, recommendation) = match observation.temperature {
        Some(temperature) => (
            Some(derived::summary(temperature, &observation.description)),
            Some(derived::recommendation(temperature).to_string()),
        ),
        None => (None, None),
    };

    WeatherSummary {
        observation,
        summary,
        recommendation,
    }
}

/// Forecast series in upstream order.
///
/// `echoed` carries the caller's coordinates for coordinate-form requests;
/// place-form requests report the coordinates the provider returned.
#[must_use]
pub fn forecast(payload: ForecastPayload, echoed: Option<Coordinates>) -> ForecastSeries {
    let entries = payload
        .list
        .into_iter()
        .map(|item| ForecastEntry {
            timestamp: DateTime::from_timestamp(item.dt, 0).unwrap_or_default(),
            dt: item.dt,
            temperature: item.main.temp,
            description: first_description(&item.weather),
        })
        .collect();

    ForecastSeries {
        city: Some(payload.city.name),
        coord: Some(echoed.unwrap_or(payload.city.coord)),
        forecast: Some(entries),
        description: None,
        provider: PROVIDER_NAME.to_string(),
    }
}

#[must_use]
pub fn air_quality(sample: PollutionSample, coord: Coordinates) -> AirQualityReading {
    AirQualityReading {
        coord: Some(coord),
        aqi: Some(sample.main.aqi),
        components: sample.components,
        description: None,
        provider: PROVIDER_NAME.to_string(),
    }
}
