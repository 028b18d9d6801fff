//! Severity profile: the thresholds and weights that parameterize every
//! evaluation call.
//!
//! A profile is always passed explicitly into the evaluator, aggregator and
//! window search. There is no process-wide mutable profile; the defaults below
//! are plain values.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Rain and wind limits that decide which classification rules fire.
///
/// The unsafe limits double as the normalization divisors for the severity
/// score, so they must be strictly positive (enforced by `validate`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub unsafe_rain_mm: f64,
    pub unsafe_wind_kmh: f64,
    pub risky_rain_mm: f64,
    pub risky_wind_kmh: f64,
    pub risky_rain_prob_pct: u8,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        SeverityThresholds {
            unsafe_rain_mm: 10.0,
            unsafe_wind_kmh: 40.0,
            risky_rain_mm: 2.5,
            risky_wind_kmh: 30.0,
            risky_rain_prob_pct: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Weights for the additive severity score plus the per-label floors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    /// Severity floor per weather-label tier: Clear, Rain Showers, Heavy Rain,
    /// Thunderstorm.
    pub storm: [f64; 4],
    pub rain_mm: f64,
    pub rain_probability: f64,
    pub wind: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        SeverityWeights {
            storm: [0.0, 0.25, 0.5, 1.0],
            rain_mm: 0.2,
            rain_probability: 0.3,
            wind: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// One threshold set and one weight set, shared by every hour of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityProfile {
    pub thresholds: SeverityThresholds,
    pub weights: SeverityWeights,
}

/// Reasons a profile cannot be used for evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("threshold `{field}` must be positive, got {value}")]
    NonPositiveLimit { field: &'static str, value: f64 },
    #[error("threshold `{field}` must not be negative, got {value}")]
    NegativeThreshold { field: &'static str, value: f64 },
    #[error("risky rain probability must be at most 100%, got {0}%")]
    ProbabilityOutOfRange(u8),
    #[error("storm weight for tier {tier} must lie in [0, 1], got {value}")]
    StormWeightOutOfRange { tier: usize, value: f64 },
    #[error("storm weights must be non-decreasing (tier {tier} is below the tier before it)")]
    StormWeightsDecreasing { tier: usize },
    #[error("weight `{field}` must not be negative, got {value}")]
    NegativeWeight { field: &'static str, value: f64 },
}

impl SeverityProfile {
    /// Checks the invariants the evaluator relies on.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let t = &self.thresholds;
        for (field, value) in [
            ("unsafe_rain_mm", t.unsafe_rain_mm),
            ("unsafe_wind_kmh", t.unsafe_wind_kmh),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ProfileError::NonPositiveLimit { field, value });
            }
        }
        for (field, value) in [
            ("risky_rain_mm", t.risky_rain_mm),
            ("risky_wind_kmh", t.risky_wind_kmh),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ProfileError::NegativeThreshold { field, value });
            }
        }
        if t.risky_rain_prob_pct > 100 {
            return Err(ProfileError::ProbabilityOutOfRange(t.risky_rain_prob_pct));
        }

        let w = &self.weights;
        for (tier, &value) in w.storm.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::StormWeightOutOfRange { tier, value });
            }
            if tier > 0 && value < w.storm[tier - 1] {
                return Err(ProfileError::StormWeightsDecreasing { tier });
            }
        }
        for (field, value) in [
            ("rain_mm", w.rain_mm),
            ("rain_probability", w.rain_probability),
            ("wind", w.wind),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ProfileError::NegativeWeight { field, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
