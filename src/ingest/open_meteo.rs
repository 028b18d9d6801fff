//! Open-Meteo Forecast API Client
//!
//! Retrieves hourly rain probability, rain amount, 10 m wind speed and WMO
//! weather codes for a location, in UTC, and maps them to
//! `HourlyObservation`s.
//!
//! API Documentation: https://open-meteo.com/en/docs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::config::ServiceSettings;
use crate::ingest::ForecastSource;
use crate::logging::{self, Component};
use crate::model::{ForecastError, HourlyObservation, WeatherLabel};
use crate::request::Location;

/// Hourly variables requested from the API, in response order.
const HOURLY_VARIABLES: &str = "precipitation_probability,rain,wind_speed_10m,weather_code";

// ============================================================================
// Open-Meteo API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenMeteoResponse {
    pub hourly: OpenMeteoHourly,
}

/// Parallel hourly arrays; index `i` of every array describes `time[i]`.
/// Far-future hours may carry `null` for some variables.
#[derive(Debug, Deserialize)]
pub struct OpenMeteoHourly {
    pub time: Vec<String>,
    pub precipitation_probability: Vec<Option<i64>>,
    pub rain: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
}

// ============================================================================
// URL Construction & Parsing
// ============================================================================

/// Builds the forecast URL for a location.
pub fn build_forecast_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{}?latitude={:.4}&longitude={:.4}&hourly={}&timezone=UTC",
        base_url.trim_end_matches('/'),
        latitude,
        longitude,
        HOURLY_VARIABLES
    )
}

/// Maps a WMO weather code to the label vocabulary used by the classifier.
pub fn weather_code_to_label(code: i32) -> WeatherLabel {
    WeatherLabel::from_wmo_code(code)
}

/// Parses an Open-Meteo timestamp. With `timezone=UTC` the API returns
/// `2025-06-14T13:00`; full RFC 3339 is accepted too.
fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map(|dt| dt.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Parses a forecast response body into hourly observations.
///
/// Hours with an unparseable timestamp or a `null` variable are skipped and
/// logged. Arrays of unequal length are rejected outright, since the hours
/// could no longer be lined up.
pub fn parse_forecast_response(body: &str) -> Result<Vec<HourlyObservation>, ForecastError> {
    let response: OpenMeteoResponse =
        serde_json::from_str(body).map_err(|e| ForecastError::ParseError(e.to_string()))?;
    let hourly = response.hourly;

    let n = hourly.time.len();
    let lengths = [
        hourly.precipitation_probability.len(),
        hourly.rain.len(),
        hourly.wind_speed_10m.len(),
        hourly.weather_code.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(ForecastError::ParseError(format!(
            "hourly arrays have mismatched lengths: time={}, others={:?}",
            n, lengths
        )));
    }

    let mut observations = Vec::with_capacity(n);
    let mut skipped = 0usize;

    for (i, raw_time) in hourly.time.iter().enumerate() {
        let Some(timestamp) = parse_time(raw_time) else {
            logging::warn(
                Component::OpenMeteo,
                None,
                &format!("Failed to parse time '{}'", raw_time),
            );
            skipped += 1;
            continue;
        };

        let (Some(prob), Some(rain), Some(wind), Some(code)) = (
            hourly.precipitation_probability[i],
            hourly.rain[i],
            hourly.wind_speed_10m[i],
            hourly.weather_code[i],
        ) else {
            skipped += 1;
            continue;
        };

        observations.push(HourlyObservation {
            timestamp,
            rain_probability_pct: u8::try_from(prob.clamp(0, 100)).unwrap_or(100),
            precipitation_mm: rain.max(0.0),
            wind_speed_kmh: wind.max(0.0),
            weather: weather_code_to_label(code),
        });
    }

    if skipped > 0 {
        logging::debug(
            Component::OpenMeteo,
            None,
            &format!("Skipped {} of {} hours with missing values", skipped, n),
        );
    }

    Ok(observations)
}

// ============================================================================
// API Client
// ============================================================================

/// Blocking Open-Meteo client.
pub struct OpenMeteoClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ForecastError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::RequestFailed(e.to_string()))?;
        Ok(OpenMeteoClient {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, ForecastError> {
        Self::new(
            &settings.open_meteo_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Fetches the full hourly forecast for a location.
    pub fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<HourlyObservation>, ForecastError> {
        let url = build_forecast_url(&self.base_url, latitude, longitude);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ForecastError::RequestFailed(format!("request timed out: {}", e))
                } else {
                    ForecastError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::HttpError(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ForecastError::RequestFailed(e.to_string()))?;

        let observations = parse_forecast_response(&body)?;
        if observations.is_empty() {
            return Err(ForecastError::NoDataAvailable(format!(
                "no usable hours for {:.4},{:.4}",
                latitude, longitude
            )));
        }
        Ok(observations)
    }
}

impl ForecastSource for OpenMeteoClient {
    fn fetch_hourly(&self, location: &Location) -> Result<Vec<HourlyObservation>, ForecastError> {
        self.fetch_forecast(location.latitude, location.longitude)
    }

    fn component(&self) -> Component {
        Component::OpenMeteo
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "latitude": 40.69,
        "longitude": -89.59,
        "hourly_units": {"time": "iso8601"},
        "hourly": {
            "time": ["2025-06-14T00:00", "2025-06-14T01:00", "2025-06-14T02:00", "2025-06-14T03:00"],
            "precipitation_probability": [5, 65, 90, null],
            "rain": [0.0, 3.4, 12.5, 0.0],
            "wind_speed_10m": [8.2, 22.0, 35.5, 4.0],
            "weather_code": [1, 61, 95, 0]
        }
    }"#;

    #[test]
    fn test_build_forecast_url() {
        let url = build_forecast_url("https://api.open-meteo.com/v1/forecast/", 40.6939, -89.5898);
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/forecast?latitude=40.6939&longitude=-89.5898\
             &hourly=precipitation_probability,rain,wind_speed_10m,weather_code&timezone=UTC"
        );
    }

    #[test]
    fn test_parse_sample_response() {
        let hours = parse_forecast_response(SAMPLE).expect("sample should parse");
        // The fourth hour has a null probability and is skipped.
        assert_eq!(hours.len(), 3);

        assert_eq!(hours[0].timestamp, Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap());
        assert_eq!(hours[0].weather, WeatherLabel::Clear);

        assert_eq!(hours[1].rain_probability_pct, 65);
        assert_eq!(hours[1].precipitation_mm, 3.4);
        assert_eq!(hours[1].weather, WeatherLabel::RainShowers);

        assert_eq!(hours[2].wind_speed_kmh, 35.5);
        assert_eq!(hours[2].weather, WeatherLabel::Thunderstorm);
    }

    #[test]
    fn test_parse_accepts_rfc3339_times() {
        let body = r#"{"hourly": {
            "time": ["2025-06-14T05:00:00Z"],
            "precipitation_probability": [10],
            "rain": [0.0],
            "wind_speed_10m": [3.0],
            "weather_code": [80]
        }}"#;
        let hours = parse_forecast_response(body).expect("should parse");
        assert_eq!(hours[0].timestamp, Utc.with_ymd_and_hms(2025, 6, 14, 5, 0, 0).unwrap());
        assert_eq!(hours[0].weather, WeatherLabel::HeavyRain);
    }

    #[test]
    fn test_bad_timestamp_is_skipped_not_fatal() {
        let body = r#"{"hourly": {
            "time": ["yesterday", "2025-06-14T01:00"],
            "precipitation_probability": [0, 0],
            "rain": [0.0, 0.0],
            "wind_speed_10m": [0.0, 0.0],
            "weather_code": [0, 0]
        }}"#;
        let hours = parse_forecast_response(body).expect("should parse");
        assert_eq!(hours.len(), 1);
    }

    #[test]
    fn test_mismatched_arrays_are_a_parse_error() {
        let body = r#"{"hourly": {
            "time": ["2025-06-14T00:00", "2025-06-14T01:00"],
            "precipitation_probability": [0],
            "rain": [0.0, 0.0],
            "wind_speed_10m": [0.0, 0.0],
            "weather_code": [0, 0]
        }}"#;
        let result = parse_forecast_response(body);
        assert!(matches!(result, Err(ForecastError::ParseError(_))), "got {:?}", result);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result = parse_forecast_response("{not json");
        assert!(matches!(result, Err(ForecastError::ParseError(_))));
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let body = r#"{"hourly": {
            "time": ["2025-06-14T00:00"],
            "precipitation_probability": [140],
            "rain": [-0.1],
            "wind_speed_10m": [0.0],
            "weather_code": [0]
        }}"#;
        let hours = parse_forecast_response(body).expect("should parse");
        assert_eq!(hours[0].rain_probability_pct, 100);
        assert_eq!(hours[0].precipitation_mm, 0.0);
    }

    #[test]
    #[ignore] // Don't run in CI - depends on external API
    fn live_fetch_returns_hourly_forecast_for_peoria() {
        let client = OpenMeteoClient::from_settings(&ServiceSettings::default())
            .expect("client should build");
        let hours = client.fetch_forecast(40.6939, -89.5898).expect("live fetch failed");
        assert!(hours.len() >= 24, "expected at least a day of hours, got {}", hours.len());
    }
}
