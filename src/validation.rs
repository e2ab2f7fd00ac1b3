//! Query validation
//!
//! Raw query parameters arrive as strings. Each query shape validates into a
//! typed value ([`PlaceQuery`] or [`LocationQuery`]) or fails with every
//! violated constraint at once.

use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::error::FieldViolation;
use crate::models::{Coordinates, LocationQuery, PlaceQuery};
use crate::{Result, WeatherError};

const CITY_LENGTH: RangeInclusive<usize> = 1..=100;
const COUNTRY_LENGTH: RangeInclusive<usize> = 2..=3;
const STATE_LENGTH: RangeInclusive<usize> = 1..=100;
const LATITUDE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE: RangeInclusive<f64> = -180.0..=180.0;

const CITY_REQUIRED: &str = "City is required.";
const CITY_MESSAGE: &str = "City name must be between 1 and 100 characters.";
const COUNTRY_MESSAGE: &str = "Country code must be 2 or 3 characters (ISO 3166).";
const STATE_MESSAGE: &str = "State/region/oblast must be between 1 and 100 characters.";
const LATITUDE_MESSAGE: &str = "Latitude must be a valid coordinate (-90 to 90).";
const LONGITUDE_MESSAGE: &str = "Longitude must be a valid coordinate (-180 to 180).";
pub const EXCLUSIVITY_MESSAGE: &str = "Provide either city or both lat and lon, but not both.";

/// Query for the endpoints that only accept a place
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}

/// Query for the endpoints that accept a place or coordinates
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocatorParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Locator query plus the forecast-only `days` parameter
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub days: Option<String>,
}

/// Validated forecast request
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub location: LocationQuery,
    /// Accepted as sent and never interpreted; does not change the upstream call
    pub days: Option<String>,
}

/// Exactly one of "city present" or "both coordinates present" must hold.
///
/// Shared by every query shape that accepts both forms.
#[must_use]
pub fn place_or_coordinates(has_city: bool, has_lat: bool, has_lon: bool) -> bool {
    has_city != (has_lat && has_lon)
}

fn check_length(
    field: &str,
    value: Option<&str>,
    range: &RangeInclusive<usize>,
    message: &str,
    violations: &mut Vec<FieldViolation>,
) {
    if let Some(value) = value {
        if !range.contains(&value.chars().count()) {
            violations.push(FieldViolation::new(field, message));
        }
    }
}

fn parse_coordinate(
    field: &str,
    raw: Option<&str>,
    range: &RangeInclusive<f64>,
    message: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(value) if range.contains(&value) => Some(value),
        _ => {
            violations.push(FieldViolation::new(field, message));
            None
        }
    }
}

fn check_disambiguators(
    country: Option<&str>,
    state: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) {
    check_length("country", country, &COUNTRY_LENGTH, COUNTRY_MESSAGE, violations);
    check_length("state", state, &STATE_LENGTH, STATE_MESSAGE, violations);
}

fn place(city: String, country: Option<String>, state: Option<String>) -> PlaceQuery {
    PlaceQuery {
        city,
        country,
        state,
    }
}

fn finish<T>(violations: Vec<FieldViolation>, value: Option<T>) -> Result<T> {
    match value {
        Some(value) if violations.is_empty() => Ok(value),
        _ => Err(WeatherError::validation(violations)),
    }
}

impl CityParams {
    /// Validate a query where `city` is mandatory
    pub fn validate(self) -> Result<PlaceQuery> {
        let mut violations = Vec::new();

        match self.city.as_deref() {
            None => violations.push(FieldViolation::new("city", CITY_REQUIRED)),
            Some(city) => check_length("city", Some(city), &CITY_LENGTH, CITY_MESSAGE, &mut violations),
        }
        check_disambiguators(self.country.as_deref(), self.state.as_deref(), &mut violations);

        let value = self.city.map(|city| place(city, self.country, self.state));
        finish(violations, value)
    }
}

impl LocatorParams {
    /// Validate a place-or-coordinates query
    pub fn validate(self) -> Result<LocationQuery> {
        let mut violations = Vec::new();

        check_length("city", self.city.as_deref(), &CITY_LENGTH, CITY_MESSAGE, &mut violations);
        check_disambiguators(self.country.as_deref(), self.state.as_deref(), &mut violations);

        let lat = parse_coordinate("lat", self.lat.as_deref(), &LATITUDE, LATITUDE_MESSAGE, &mut violations);
        let lon = parse_coordinate("lon", self.lon.as_deref(), &LONGITUDE, LONGITUDE_MESSAGE, &mut violations);

        let has_city = self.city.as_deref().is_some_and(|c| !c.is_empty());
        if !place_or_coordinates(has_city, self.lat.is_some(), self.lon.is_some()) {
            violations.push(FieldViolation::new("location", EXCLUSIVITY_MESSAGE));
        }

        let value = match (self.city, lat, lon) {
            (Some(city), None, None) => Some(LocationQuery::Place(place(city, self.country, self.state))),
            (None, Some(lat), Some(lon)) => Some(LocationQuery::Coordinates(Coordinates::new(lat, lon))),
            _ => None,
        };
        finish(violations, value)
    }
}

impl ForecastParams {
    /// Validate a forecast query; `days` is passed through untouched
    pub fn validate(self) -> Result<ForecastRequest> {
        let location = LocatorParams {
            city: self.city,
            country: self.country,
            state: self.state,
            lat: self.lat,
            lon: self.lon,
        }
        .validate()?;

        Ok(ForecastRequest {
            location,
            days: self.days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn city(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn violations(err: WeatherError) -> Vec<FieldViolation> {
        match err {
            WeatherError::Validation { violations } => violations,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn fields(err: WeatherError) -> Vec<String> {
        violations(err).into_iter().map(|v| v.field).collect()
    }

    #[rstest]
    #[case(true, false, false, true)]
    #[case(false, true, true, true)]
    #[case(true, true, true, false)]
    #[case(false, false, false, false)]
    #[case(false, true, false, false)]
    #[case(false, false, true, false)]
    #[case(true, true, false, false)]
    fn test_place_or_coordinates(
        #[case] has_city: bool,
        #[case] has_lat: bool,
        #[case] has_lon: bool,
        #[case] valid: bool,
    ) {
        assert_eq!(place_or_coordinates(has_city, has_lat, has_lon), valid);
    }

    #[test]
    fn test_city_params_valid() {
        let params = CityParams {
            city: city("Springfield"),
            country: city("US"),
            state: city("IL"),
        };
        let place = params.validate().unwrap();
        assert_eq!(place, PlaceQuery::new("Springfield").with_country("US").with_state("IL"));
    }

    #[test]
    fn test_city_params_require_city() {
        let err = CityParams::default().validate().unwrap_err();
        assert_eq!(
            violations(err),
            vec![FieldViolation::new("city", "City is required.")]
        );
    }

    #[test]
    fn test_city_params_reject_empty_city() {
        let err = CityParams {
            city: city(""),
            ..CityParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["city"]);
    }

    #[test]
    fn test_city_params_list_every_violation() {
        let err = CityParams {
            city: Some("x".repeat(101)),
            country: city("U"),
            state: city(""),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["city", "country", "state"]);
    }

    #[rstest]
    #[case("US", true)]
    #[case("UKR", true)]
    #[case("U", false)]
    #[case("USAX", false)]
    fn test_country_length(#[case] country: &str, #[case] valid: bool) {
        let result = CityParams {
            city: city("Kyiv"),
            country: city(country),
            state: None,
        }
        .validate();
        assert_eq!(result.is_ok(), valid);
    }

    #[test]
    fn test_city_length_counts_characters() {
        // 100 multi-byte characters are still within bounds
        let result = CityParams {
            city: Some("ü".repeat(100)),
            ..CityParams::default()
        }
        .validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_locator_place_form() {
        let location = LocatorParams {
            city: city("London"),
            country: city("GB"),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            location,
            LocationQuery::Place(PlaceQuery::new("London").with_country("GB"))
        );
    }

    #[test]
    fn test_locator_coordinate_form() {
        let location = LocatorParams {
            lat: city("51.5074"),
            lon: city("-0.1278"),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            location,
            LocationQuery::Coordinates(Coordinates::new(51.5074, -0.1278))
        );
    }

    #[test]
    fn test_locator_rejects_neither() {
        let err = LocatorParams::default().validate().unwrap_err();
        assert_eq!(
            violations(err),
            vec![FieldViolation::new("location", EXCLUSIVITY_MESSAGE)]
        );
    }

    #[test]
    fn test_locator_rejects_both_forms() {
        let err = LocatorParams {
            city: city("London"),
            lat: city("51.5074"),
            lon: city("-0.1278"),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            violations(err),
            vec![FieldViolation::new("location", EXCLUSIVITY_MESSAGE)]
        );
    }

    #[rstest]
    #[case(Some("51.5"), None)]
    #[case(None, Some("-0.12"))]
    fn test_locator_rejects_single_coordinate(#[case] lat: Option<&str>, #[case] lon: Option<&str>) {
        let err = LocatorParams {
            lat: lat.map(str::to_string),
            lon: lon.map(str::to_string),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["location"]);
    }

    #[rstest]
    #[case("91", "0", "lat")]
    #[case("-90.5", "0", "lat")]
    #[case("0", "180.01", "lon")]
    #[case("north", "0", "lat")]
    #[case("0", "NaN", "lon")]
    fn test_locator_rejects_bad_coordinates(#[case] lat: &str, #[case] lon: &str, #[case] field: &str) {
        let err = LocatorParams {
            lat: city(lat),
            lon: city(lon),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec![field.to_string()]);
    }

    #[test]
    fn test_locator_accepts_coordinate_bounds() {
        let location = LocatorParams {
            lat: city("-90"),
            lon: city("180"),
            ..LocatorParams::default()
        }
        .validate()
        .unwrap();
        assert_eq!(location, LocationQuery::Coordinates(Coordinates::new(-90.0, 180.0)));
    }

    #[rstest]
    #[case("5")]
    #[case("abc")]
    #[case("-1")]
    #[case("2.5")]
    fn test_forecast_days_is_not_interpreted(#[case] days: &str) {
        let request = ForecastParams {
            city: city("London"),
            days: city(days),
            ..ForecastParams::default()
        }
        .validate()
        .unwrap();
        assert_eq!(request.days.as_deref(), Some(days));
        assert_eq!(request.location, LocationQuery::Place(PlaceQuery::new("London")));
    }

    #[test]
    fn test_forecast_reports_location_violations_only() {
        let err = ForecastParams {
            days: city("soon"),
            ..ForecastParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["location"]);
    }
}
