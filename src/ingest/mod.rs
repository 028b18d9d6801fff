//! Forecast ingestion.
//!
//! Submodules:
//! - `open_meteo` - live hourly forecasts from the Open-Meteo API.
//! - `replay`     - recorded forecasts replayed from a JSON file.
//!
//! Every source yields `HourlyObservation`s already mapped to the four-label
//! vocabulary; `fetch_window` then narrows them to the requested span.

pub mod open_meteo;
pub mod replay;

use chrono::{DateTime, Utc};

use crate::logging::Component;
use crate::model::{ForecastError, HourlyObservation};
use crate::request::Location;

/// A provider of hourly forecasts for a location.
pub trait ForecastSource {
    /// All hours the provider currently has for `location`, in time order.
    fn fetch_hourly(&self, location: &Location) -> Result<Vec<HourlyObservation>, ForecastError>;

    /// Component tag used when logging this source's failures.
    fn component(&self) -> Component;
}

/// Keeps hours whose timestamp lies in `[start, end)`.
pub fn filter_window(
    hours: Vec<HourlyObservation>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<HourlyObservation> {
    hours
        .into_iter()
        .filter(|h| h.timestamp >= start && h.timestamp < end)
        .collect()
}

/// Fetches from `source` and narrows the result to `[start, end)`.
pub fn fetch_window<S: ForecastSource + ?Sized>(
    source: &S,
    location: &Location,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<HourlyObservation>, ForecastError> {
    let hours = source.fetch_hourly(location)?;
    Ok(filter_window(hours, start, end))
}
