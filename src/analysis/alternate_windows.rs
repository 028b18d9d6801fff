//! Alternate event window search.
//!
//! Given roughly one day of hourly forecasts and the event's duration, slides
//! a fixed-length window across the day, scores each window with the same
//! classifier used for the requested slot, drops windows that lean Unsafe,
//! and returns the best K.
//!
//! Scoring reuses `classify_event`, so a suggested window is never worse by
//! the same metric than the classification the caller is trying to improve on.

use chrono::Duration;

use crate::classification::classify_event;
use crate::model::{CandidateWindow, HourlyObservation};
use crate::profile::SeverityProfile;

/// Hours considered by the search, regardless of how many are supplied.
pub const MAX_SEARCH_HOURS: usize = 24;

/// Windows scoring at or above this percentage are never proposed.
pub const ALTERNATE_SEVERITY_CUTOFF_PCT: u8 = 50;

/// Returns up to `k` contiguous windows of `duration_hours` hours, ordered by
/// severity ascending and then by earliest start.
///
/// Only the first `min(hours.len(), 24)` hours are searched. Returns an empty
/// list when `duration_hours` or `k` is zero or when fewer than
/// `duration_hours` hours are supplied.
pub fn find_top_k_windows(
    hours: &[HourlyObservation],
    duration_hours: usize,
    k: usize,
    profile: &SeverityProfile,
) -> Vec<CandidateWindow> {
    if duration_hours == 0 || k == 0 || hours.len() < duration_hours {
        return Vec::new();
    }

    let limit = hours.len().min(MAX_SEARCH_HOURS);

    let mut candidates: Vec<CandidateWindow> = hours[..limit]
        .windows(duration_hours)
        .filter_map(|window| {
            let result = classify_event(window, profile);
            if result.severity_pct >= ALTERNATE_SEVERITY_CUTOFF_PCT {
                return None;
            }
            let first = window.first()?;
            let last = window.last()?;
            Some(CandidateWindow {
                start_time: first.timestamp,
                end_time: last.timestamp + Duration::hours(1),
                severity_pct: result.severity_pct,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.severity_pct
            .cmp(&b.severity_pct)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    candidates.truncate(k);
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
