//! Core data types for the event weather guard service.
//!
//! This module defines the shared domain model imported by all other modules:
//! hourly observations, risk levels, evaluation/classification results and
//! candidate windows. It contains no I/O; the only logic is the mapping
//! between weather labels, provider codes and severity tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Weather labels
// ---------------------------------------------------------------------------

/// Condition label attached to each forecast hour, in ascending severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherLabel {
    Clear,
    RainShowers,
    HeavyRain,
    Thunderstorm,
}

impl WeatherLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherLabel::Clear => "Clear",
            WeatherLabel::RainShowers => "Rain Showers",
            WeatherLabel::HeavyRain => "Heavy Rain",
            WeatherLabel::Thunderstorm => "Thunderstorm",
        }
    }

    /// Parses a label string. Anything outside the known vocabulary is
    /// treated as `Clear` so that evaluation stays total.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Thunderstorm" => WeatherLabel::Thunderstorm,
            "Heavy Rain" => WeatherLabel::HeavyRain,
            "Rain Showers" => WeatherLabel::RainShowers,
            _ => WeatherLabel::Clear,
        }
    }

    /// Maps a WMO weather code (as reported by Open-Meteo) to a label.
    ///
    ///   code >= 95 → Thunderstorm
    ///   code >= 80 → Heavy Rain
    ///   code >= 60 → Rain Showers
    ///   otherwise  → Clear
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            c if c >= 95 => WeatherLabel::Thunderstorm,
            c if c >= 80 => WeatherLabel::HeavyRain,
            c if c >= 60 => WeatherLabel::RainShowers,
            _ => WeatherLabel::Clear,
        }
    }

    /// Index into `SeverityWeights::storm`.
    pub fn tier(&self) -> usize {
        match self {
            WeatherLabel::Clear => 0,
            WeatherLabel::RainShowers => 1,
            WeatherLabel::HeavyRain => 2,
            WeatherLabel::Thunderstorm => 3,
        }
    }
}

impl fmt::Display for WeatherLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for WeatherLabel {
    fn from(label: String) -> Self {
        WeatherLabel::from_label(&label)
    }
}

impl From<WeatherLabel> for String {
    fn from(label: WeatherLabel) -> Self {
        label.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// One hour of forecast weather at the event location.
///
/// Produced by an `ingest` source after mapping provider codes to labels and
/// filtering to the requested window. Sequences are assumed to be ordered by
/// `timestamp`; nothing downstream re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "rain_prob")]
    pub rain_probability_pct: u8,
    #[serde(rename = "precip_mm")]
    pub precipitation_mm: f64,
    #[serde(rename = "wind_kmh")]
    pub wind_speed_kmh: f64,
    pub weather: WeatherLabel,
}

// ---------------------------------------------------------------------------
// Risk levels and results
// ---------------------------------------------------------------------------

/// Risk levels, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Risky,
    Unsafe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Risky => "Risky",
            RiskLevel::Unsafe => "Unsafe",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk report for a single forecast hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEvaluation {
    pub level: RiskLevel,
    pub reason: String,
    /// Normalized severity in `[0, 1]`.
    pub severity: f64,
}

/// Event-level verdict aggregated over every hour of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub level: RiskLevel,
    /// One entry per non-Safe hour in input order, or a single default reason.
    pub reasons: Vec<String>,
    pub summary: String,
    /// Peak hourly severity scaled to 0–100.
    pub severity_pct: u8,
}

/// An alternative event slot proposed by the window search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateWindow {
    pub start_time: DateTime<Utc>,
    /// Exclusive: the hour after the last included hour.
    pub end_time: DateTime<Utc>,
    #[serde(rename = "score")]
    pub severity_pct: u8,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding forecast data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// Non-2xx HTTP response from the provider.
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The response body or fixture could not be deserialized.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The provider answered but no usable hours were present.
    #[error("No forecast data available: {0}")]
    NoDataAvailable(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Risky);
        assert!(RiskLevel::Risky < RiskLevel::Unsafe);
        assert_eq!(
            [RiskLevel::Risky, RiskLevel::Unsafe, RiskLevel::Safe].iter().max(),
            Some(&RiskLevel::Unsafe)
        );
    }

    #[test]
    fn test_wmo_code_boundaries() {
        assert_eq!(WeatherLabel::from_wmo_code(0), WeatherLabel::Clear);
        assert_eq!(WeatherLabel::from_wmo_code(59), WeatherLabel::Clear);
        assert_eq!(WeatherLabel::from_wmo_code(60), WeatherLabel::RainShowers);
        assert_eq!(WeatherLabel::from_wmo_code(79), WeatherLabel::RainShowers);
        assert_eq!(WeatherLabel::from_wmo_code(80), WeatherLabel::HeavyRain);
        assert_eq!(WeatherLabel::from_wmo_code(94), WeatherLabel::HeavyRain);
        assert_eq!(WeatherLabel::from_wmo_code(95), WeatherLabel::Thunderstorm);
        assert_eq!(WeatherLabel::from_wmo_code(99), WeatherLabel::Thunderstorm);
    }

    #[test]
    fn test_unknown_label_defaults_to_clear() {
        assert_eq!(WeatherLabel::from_label("Blizzard"), WeatherLabel::Clear);
        assert_eq!(WeatherLabel::from_label(""), WeatherLabel::Clear);
        assert_eq!(WeatherLabel::from_label("Heavy Rain"), WeatherLabel::HeavyRain);
    }

    #[test]
    fn test_tiers_ascend_with_label_severity() {
        let tiers: Vec<usize> = [
            WeatherLabel::Clear,
            WeatherLabel::RainShowers,
            WeatherLabel::HeavyRain,
            WeatherLabel::Thunderstorm,
        ]
        .iter()
        .map(WeatherLabel::tier)
        .collect();
        assert_eq!(tiers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_observation_json_uses_wire_field_names() {
        let obs = HourlyObservation {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 14, 14, 0, 0).unwrap(),
            rain_probability_pct: 55,
            precipitation_mm: 3.2,
            wind_speed_kmh: 12.0,
            weather: WeatherLabel::RainShowers,
        };
        let json = serde_json::to_value(&obs).expect("observation should serialize");
        assert_eq!(json["rain_prob"], 55);
        assert_eq!(json["precip_mm"], 3.2);
        assert_eq!(json["wind_kmh"], 12.0);
        assert_eq!(json["weather"], "Rain Showers");

        let back: HourlyObservation =
            serde_json::from_value(json).expect("observation should deserialize");
        assert_eq!(back, obs);
    }

    #[test]
    fn test_unknown_label_in_json_deserializes_as_clear() {
        let json = r#"{"time":"2025-06-14T14:00:00Z","rain_prob":0,"precip_mm":0.0,"wind_kmh":0.0,"weather":"Fog"}"#;
        let obs: HourlyObservation = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(obs.weather, WeatherLabel::Clear);
    }

    #[test]
    fn test_forecast_error_display() {
        assert_eq!(ForecastError::HttpError(503).to_string(), "HTTP error: 503");
        assert_eq!(
            ForecastError::ParseError("bad json".to_string()).to_string(),
            "Parse error: bad json"
        );
    }
}
