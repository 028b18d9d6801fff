//! Event request model and validation.
//!
//! # Clock injection
//! Time-window validation accepts a `now: DateTime<Utc>` parameter rather than
//! calling `Utc::now()` internally, so tests stay deterministic without
//! mocking. `validate_event_time` is the convenience wrapper for live use.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Short "lat,lon" tag used in log lines.
    pub fn tag(&self) -> String {
        format!("{:.2},{:.2}", self.latitude, self.longitude)
    }
}

/// An outdoor event to assess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventForecastRequest {
    pub name: String,
    pub location: Location,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Ask for alternate slots when the requested one is not Safe.
    #[serde(default)]
    pub list_alternates: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid event timings: event must start in the future")]
    StartNotInFuture,
    #[error("Invalid event timings: event duration must be positive")]
    NonPositiveDuration,
    #[error("Invalid event timings: event must end within the next {max_days} days")]
    BeyondHorizon { max_days: i64 },
    #[error(
        "Invalid coordinates: latitude must be in [-90, 90] and longitude must be in [-180, 180]"
    )]
    InvalidCoordinates,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Checks that the event starts strictly after `now`, ends strictly after it
/// starts, and ends no later than `now + max_horizon_days`.
///
/// Ending exactly on the horizon is allowed.
pub fn validate_event_time_at(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    max_horizon_days: i64,
) -> Result<(), RequestError> {
    if start <= now {
        return Err(RequestError::StartNotInFuture);
    }
    if end <= start {
        return Err(RequestError::NonPositiveDuration);
    }
    let horizon = TimeDelta::try_days(max_horizon_days)
        .and_then(|days| now.checked_add_signed(days))
        .ok_or(RequestError::BeyondHorizon { max_days: max_horizon_days })?;
    if end > horizon {
        return Err(RequestError::BeyondHorizon { max_days: max_horizon_days });
    }
    Ok(())
}

/// Convenience wrapper that uses the real current time.
/// Use `validate_event_time_at` in tests to keep them deterministic.
pub fn validate_event_time(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_horizon_days: i64,
) -> Result<(), RequestError> {
    validate_event_time_at(start, end, Utc::now(), max_horizon_days)
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180].
pub fn validate_location(location: &Location) -> Result<(), RequestError> {
    let lat_ok = (-90.0..=90.0).contains(&location.latitude);
    let lon_ok = (-180.0..=180.0).contains(&location.longitude);
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(RequestError::InvalidCoordinates)
    }
}

/// Event length in whole hours, rounding partial hours up. Never below 1.
pub fn event_duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
    let minutes = (end - start).num_minutes().max(0);
    let hours = (minutes + 59) / 60;
    usize::try_from(hours).unwrap_or(0).max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
