//! Event-level aggregation of hourly evaluations.

use crate::classification::evaluate::evaluate_hour;
use crate::model::{ClassificationResult, HourlyEvaluation, HourlyObservation, RiskLevel};
use crate::profile::SeverityProfile;

/// Sole reason reported when no hour in the window was Risky or Unsafe.
pub const DEFAULT_REASON: &str = "No significant wind or rain expected.";

pub const SUMMARY_SAFE: &str = "Weather conditions are safe throughout the event.";
pub const SUMMARY_UNSAFE: &str = "Severe weather conditions are expected during the event.";
pub const SUMMARY_RISKY: &str = "Moderate rainfall and winds are expected during the event.";

/// Classifies an event window from its hourly observations.
///
/// - `level` is the maximum hourly level.
/// - `reasons` holds the reason of every non-Safe hour in input order, or
///   `DEFAULT_REASON` alone when every hour is Safe.
/// - `summary` is keyed by the level of the peak-severity hour (the first
///   hour wins ties), which is not necessarily the worst-level hour.
/// - `severity_pct` is the peak severity scaled to 0–100 and rounded.
///
/// An empty window yields a vacuous Safe result with zero severity rather
/// than an error; callers that must distinguish "no data" check for emptiness
/// before classifying.
pub fn classify_event(hours: &[HourlyObservation], profile: &SeverityProfile) -> ClassificationResult {
    let mut level = RiskLevel::Safe;
    let mut reasons = Vec::new();
    let mut peak: Option<HourlyEvaluation> = None;

    for h in hours {
        let eval = evaluate_hour(h, &profile.thresholds, &profile.weights);

        level = level.max(eval.level);

        if eval.level != RiskLevel::Safe {
            reasons.push(eval.reason.clone());
        }

        let is_new_peak = peak
            .as_ref()
            .is_none_or(|current| eval.severity > current.severity);
        if is_new_peak {
            peak = Some(eval);
        }
    }

    if reasons.is_empty() {
        reasons.push(DEFAULT_REASON.to_string());
    }

    let peak_level = peak.as_ref().map_or(RiskLevel::Safe, |p| p.level);
    let peak_severity = peak.as_ref().map_or(0.0, |p| p.severity);

    ClassificationResult {
        level,
        reasons,
        summary: summary_for(peak_level).to_string(),
        severity_pct: severity_percent(peak_severity),
    }
}

/// Fixed summary message for the peak hour's level.
pub fn summary_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => SUMMARY_SAFE,
        RiskLevel::Unsafe => SUMMARY_UNSAFE,
        RiskLevel::Risky => SUMMARY_RISKY,
    }
}

/// Scales a `[0, 1]` severity to a rounded 0–100 percentage.
pub fn severity_percent(severity: f64) -> u8 {
    // The `as` cast saturates, so out-of-range or NaN input cannot wrap.
    (severity.clamp(0.0, 1.0) * 100.0).round() as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherLabel;
    use chrono::{Duration, TimeZone, Utc};

    fn hours_from(specs: &[(f64, f64, u8, WeatherLabel)]) -> Vec<HourlyObservation> {
        let start = Utc.with_ymd_and_hms(2025, 6, 14, 8, 0, 0).unwrap();
        specs
            .iter()
            .enumerate()
            .map(|(i, &(precip, wind, prob, weather))| HourlyObservation {
                timestamp: start + Duration::hours(i as i64),
                rain_probability_pct: prob,
                precipitation_mm: precip,
                wind_speed_kmh: wind,
                weather,
            })
            .collect()
    }

    fn calm() -> (f64, f64, u8, WeatherLabel) {
        (0.0, 5.0, 0, WeatherLabel::Clear)
    }

    // --- All-safe windows ---------------------------------------------------

    #[test]
    fn test_six_calm_hours_are_safe_with_default_reason() {
        let hours = hours_from(&[calm(); 6]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Safe);
        assert_eq!(result.reasons, vec![DEFAULT_REASON.to_string()]);
        assert_eq!(result.summary, SUMMARY_SAFE);
        // 5 km/h → 0.5 · 0.125 = 0.0625 → 6%
        assert_eq!(result.severity_pct, 6);
    }

    #[test]
    fn test_still_calm_hours_score_zero() {
        let hours = hours_from(&[(0.0, 0.0, 0, WeatherLabel::Clear); 6]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Safe);
        assert_eq!(result.severity_pct, 0);
        assert_eq!(result.summary, SUMMARY_SAFE, "all-zero peak must still be the Safe hour");
    }

    #[test]
    fn test_safe_window_reports_peak_subthreshold_severity() {
        // 20 km/h and 30% stay below every risky limit: 0.25 + 0.09 = 0.34.
        let hours = hours_from(&[calm(), (0.0, 20.0, 30, WeatherLabel::Clear), calm()]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Safe);
        assert_eq!(result.severity_pct, 34);
        assert_eq!(result.reasons.len(), 1);
    }

    // --- Mixed windows ------------------------------------------------------

    #[test]
    fn test_single_unsafe_hour_yields_one_reason() {
        let hours = hours_from(&[calm(), calm(), (12.0, 10.0, 20, WeatherLabel::Clear), calm()]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Unsafe);
        assert_eq!(
            result.reasons,
            vec!["Extreme weather: 12.0 mm rain and 10.0 km/h wind at 10:00".to_string()]
        );
        assert_eq!(result.summary, SUMMARY_UNSAFE);
    }

    #[test]
    fn test_reasons_follow_input_order() {
        let hours = hours_from(&[
            (0.0, 0.0, 0, WeatherLabel::HeavyRain),
            calm(),
            (0.0, 0.0, 0, WeatherLabel::Thunderstorm),
        ]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Unsafe);
        assert_eq!(
            result.reasons,
            vec![
                "Heavy rain predicted at 08:00".to_string(),
                "Thunderstorm predicted at 10:00".to_string(),
            ]
        );
        assert_eq!(result.severity_pct, 100);
    }

    #[test]
    fn test_summary_keys_on_peak_hour_not_worst_level() {
        // Risky hour (40% prob) scores 0.12; the Safe windy hour scores 0.3625.
        let hours = hours_from(&[(0.0, 0.0, 40, WeatherLabel::Clear), (0.0, 29.0, 0, WeatherLabel::Clear)]);
        let result = classify_event(&hours, &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Risky);
        assert_eq!(result.summary, SUMMARY_SAFE);
        assert_eq!(result.severity_pct, 36);
    }

    #[test]
    fn test_peak_ties_resolve_to_first_hour() {
        // Raise the Clear floor so a Safe hour and a Risky hour score exactly
        // the same 0.5; whichever comes first decides the summary.
        let mut profile = SeverityProfile::default();
        profile.weights.storm = [0.5, 0.5, 0.5, 1.0];
        let safe = (0.0, 0.0, 0, WeatherLabel::Clear);
        let risky = (0.0, 0.0, 0, WeatherLabel::HeavyRain);

        let safe_first = classify_event(&hours_from(&[safe, risky]), &profile);
        assert_eq!(safe_first.level, RiskLevel::Risky);
        assert_eq!(safe_first.summary, SUMMARY_SAFE);
        assert_eq!(safe_first.severity_pct, 50);

        let risky_first = classify_event(&hours_from(&[risky, safe]), &profile);
        assert_eq!(risky_first.summary, SUMMARY_RISKY);
    }

    // --- Empty input --------------------------------------------------------

    #[test]
    fn test_empty_window_is_vacuously_safe() {
        let result = classify_event(&[], &SeverityProfile::default());
        assert_eq!(result.level, RiskLevel::Safe);
        assert_eq!(result.reasons, vec![DEFAULT_REASON.to_string()]);
        assert_eq!(result.summary, SUMMARY_SAFE);
        assert_eq!(result.severity_pct, 0);
    }

    // --- Percent scaling ----------------------------------------------------

    #[test]
    fn test_severity_percent_rounds_to_nearest() {
        assert_eq!(severity_percent(0.0), 0);
        assert_eq!(severity_percent(0.344), 34);
        assert_eq!(severity_percent(0.346), 35);
        assert_eq!(severity_percent(1.0), 100);
        assert_eq!(severity_percent(f64::NAN), 0);
    }
}
