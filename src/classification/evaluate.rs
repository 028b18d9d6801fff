//! Hourly risk evaluation.
//!
//! `evaluate_hour` is total over its input domain: every observation gets a
//! level, a reason and a severity, even with unknown labels or extreme values.

use crate::classification::rules::{CLASSIFICATION_RULES, RiskRule};
use crate::model::{HourlyEvaluation, HourlyObservation, RiskLevel};
use crate::profile::{SeverityThresholds, SeverityWeights};

/// Reason attached to an hour that matched no rule.
pub const FAVORABLE_REASON: &str = "Favorable weather conditions.";

/// Assesses the weather risk for a single forecast hour.
///
/// The highest-level matching rule wins; among rules of equal level the first
/// in `CLASSIFICATION_RULES` order supplies the reason. Severity is computed
/// independently of which rule matched.
pub fn evaluate_hour(
    h: &HourlyObservation,
    t: &SeverityThresholds,
    w: &SeverityWeights,
) -> HourlyEvaluation {
    let mut selected: Option<&RiskRule> = None;

    for rule in CLASSIFICATION_RULES {
        if !(rule.matches)(h, t) {
            continue;
        }
        match selected {
            Some(current) if rule.level <= current.level => {}
            _ => selected = Some(rule),
        }
    }

    let severity = compute_severity(h, t, w);

    match selected {
        Some(rule) => HourlyEvaluation {
            level: rule.level,
            reason: (rule.describe)(h),
            severity,
        },
        None => HourlyEvaluation {
            level: RiskLevel::Safe,
            reason: FAVORABLE_REASON.to_string(),
            severity,
        },
    }
}

/// Normalized severity score in `[0, 1]`.
///
///   rain     = min(1, precip / unsafe_rain_mm)
///   wind     = min(1, wind / unsafe_wind_kmh)
///   prob     = min(1, rain_prob / 100)
///   weighted = w.rain_mm·rain + w.wind·wind + w.rain_probability·prob
///   severity = min(1, max(weighted, storm_floor(label)))
pub fn compute_severity(
    h: &HourlyObservation,
    t: &SeverityThresholds,
    w: &SeverityWeights,
) -> f64 {
    let rain = (h.precipitation_mm / t.unsafe_rain_mm).min(1.0);
    let wind = (h.wind_speed_kmh / t.unsafe_wind_kmh).min(1.0);
    let prob = (f64::from(h.rain_probability_pct) / 100.0).min(1.0);

    let weighted = w.rain_mm * rain + w.wind * wind + w.rain_probability * prob;

    weighted.max(storm_floor(h, w)).min(1.0)
}

/// Minimum severity imposed by the hour's weather label.
fn storm_floor(h: &HourlyObservation, w: &SeverityWeights) -> f64 {
    w.storm[h.weather.tier()]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
