//! Development mode: replay recorded forecasts
//!
//! When the live Open-Meteo API is unavailable (offline work, demos, tests),
//! use this module to replay a forecast captured to a JSON file. Timestamps
//! can be shifted forward by whole days so an old recording lines up with
//! "now".

use chrono::{DateTime, TimeDelta, Utc};
use std::path::{Path, PathBuf};

use crate::ingest::ForecastSource;
use crate::logging::{self, Component};
use crate::model::{ForecastError, HourlyObservation};
use crate::request::Location;

/// Configuration for forecast replay
pub struct ForecastReplay {
    /// JSON file holding an array of `HourlyObservation`s
    pub path: PathBuf,
    /// Shift every recorded hour forward by this many days
    pub days_offset: i64,
}

impl ForecastReplay {
    /// Create a new replay source
    ///
    /// # Arguments
    /// * `path` - Recorded forecast file
    /// * `days_offset` - Replay the recording as if it were this many days later
    pub fn new<P: AsRef<Path>>(path: P, days_offset: i64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            days_offset,
        }
    }

    /// Load the recording and apply the day offset
    pub fn load(&self) -> Result<Vec<HourlyObservation>, ForecastError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            ForecastError::RequestFailed(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let hours: Vec<HourlyObservation> =
            serde_json::from_str(&text).map_err(|e| ForecastError::ParseError(e.to_string()))?;

        if hours.is_empty() {
            return Err(ForecastError::NoDataAvailable(format!(
                "recording {} is empty",
                self.path.display()
            )));
        }

        shift_days(hours, self.days_offset)
    }

    /// Get the covered time range of a set of hours
    pub fn data_range(hours: &[HourlyObservation]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = hours.iter().map(|h| h.timestamp).min()?;
        let last = hours.iter().map(|h| h.timestamp).max()?;
        Some((first, last))
    }
}

/// Moves every timestamp forward by `days` (backward when negative).
///
/// An offset that pushes any timestamp outside the representable range is a
/// `ParseError`.
pub fn shift_days(
    hours: Vec<HourlyObservation>,
    days: i64,
) -> Result<Vec<HourlyObservation>, ForecastError> {
    if days == 0 {
        return Ok(hours);
    }
    let out_of_range = || ForecastError::ParseError(format!("day offset {} is out of range", days));
    let offset = TimeDelta::try_days(days).ok_or_else(out_of_range)?;
    hours
        .into_iter()
        .map(|mut h| {
            h.timestamp = h.timestamp.checked_add_signed(offset).ok_or_else(out_of_range)?;
            Ok(h)
        })
        .collect()
}

impl ForecastSource for ForecastReplay {
    fn fetch_hourly(&self, location: &Location) -> Result<Vec<HourlyObservation>, ForecastError> {
        let hours = self.load()?;
        if let Some((first, last)) = Self::data_range(&hours) {
            logging::debug(
                Component::Replay,
                Some(&location.tag()),
                &format!(
                    "Replaying {} hours from {} ({} to {})",
                    hours.len(),
                    self.path.display(),
                    first.to_rfc3339(),
                    last.to_rfc3339()
                ),
            );
        }
        Ok(hours)
    }

    fn component(&self) -> Component {
        Component::Replay
    }
}
