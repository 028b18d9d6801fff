//! Ordered rule table for hourly risk classification.
//!
//! Each rule is a plain record: an identifier, the level it assigns, a
//! predicate over the observation and thresholds, and a description builder.
//! Order matters: when several rules of the same level match, the earliest
//! one supplies the reason.

use crate::model::{HourlyObservation, RiskLevel, WeatherLabel};
use crate::profile::SeverityThresholds;

/// A single classification rule.
pub struct RiskRule {
    pub id: &'static str,
    pub level: RiskLevel,
    pub matches: fn(&HourlyObservation, &SeverityThresholds) -> bool,
    pub describe: fn(&HourlyObservation) -> String,
}

/// All rules, in priority order within each level.
pub static CLASSIFICATION_RULES: &[RiskRule] = &[
    RiskRule {
        id: "UNSAFE_THUNDERSTORM",
        level: RiskLevel::Unsafe,
        matches: is_thunderstorm,
        describe: describe_thunderstorm,
    },
    RiskRule {
        id: "UNSAFE_EXTREME_RAIN_WIND",
        level: RiskLevel::Unsafe,
        matches: is_extreme_rain_or_wind,
        describe: describe_extreme_rain_or_wind,
    },
    RiskRule {
        id: "RISKY_MODERATE_RAIN_WIND",
        level: RiskLevel::Risky,
        matches: is_moderate_rain_or_wind,
        describe: describe_moderate_rain_or_wind,
    },
    RiskRule {
        id: "RISKY_HEAVY_RAIN",
        level: RiskLevel::Risky,
        matches: is_heavy_rain,
        describe: describe_heavy_rain,
    },
];

/// Hour of day (UTC) used in every rule description, e.g. "14:00".
pub(crate) fn hour_label(h: &HourlyObservation) -> String {
    h.timestamp.format("%H:%M").to_string()
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn is_thunderstorm(h: &HourlyObservation, _t: &SeverityThresholds) -> bool {
    h.weather == WeatherLabel::Thunderstorm
}

fn is_extreme_rain_or_wind(h: &HourlyObservation, t: &SeverityThresholds) -> bool {
    h.precipitation_mm >= t.unsafe_rain_mm || h.wind_speed_kmh >= t.unsafe_wind_kmh
}

fn is_moderate_rain_or_wind(h: &HourlyObservation, t: &SeverityThresholds) -> bool {
    h.precipitation_mm >= t.risky_rain_mm
        || h.wind_speed_kmh >= t.risky_wind_kmh
        || h.rain_probability_pct >= t.risky_rain_prob_pct
}

fn is_heavy_rain(h: &HourlyObservation, _t: &SeverityThresholds) -> bool {
    h.weather == WeatherLabel::HeavyRain
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

fn describe_thunderstorm(h: &HourlyObservation) -> String {
    format!("Thunderstorm predicted at {}", hour_label(h))
}

fn describe_extreme_rain_or_wind(h: &HourlyObservation) -> String {
    format!(
        "Extreme weather: {:.1} mm rain and {:.1} km/h wind at {}",
        h.precipitation_mm,
        h.wind_speed_kmh,
        hour_label(h)
    )
}

fn describe_moderate_rain_or_wind(h: &HourlyObservation) -> String {
    format!(
        "Moderate risk: {:.1} mm rain, {:.1} km/h wind, {}% rain probability at {}",
        h.precipitation_mm,
        h.wind_speed_kmh,
        h.rain_probability_pct,
        hour_label(h)
    )
}

fn describe_heavy_rain(h: &HourlyObservation) -> String {
    format!("Heavy rain predicted at {}", hour_label(h))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
