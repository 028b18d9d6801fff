//! Event forecast service
//!
//! Ties the pieces together for one request: validate, fetch and narrow the
//! forecast, classify the event, and when the event is not Safe look for
//! better start times over the next day.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::analysis::find_top_k_windows;
use crate::classification::classify_event;
use crate::config::AppConfig;
use crate::ingest::{ForecastSource, fetch_window};
use crate::logging::{self, Component};
use crate::model::{CandidateWindow, ForecastError, HourlyObservation, RiskLevel};
use crate::request::{
    EventForecastRequest, RequestError, event_duration_hours, validate_event_time_at,
    validate_location,
};

/// Hours searched for alternate start times, counted from "now".
const ALTERNATE_SEARCH_HOURS: i64 = 24;

/// Outcome of one assessment, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventForecastResponse {
    pub classification: RiskLevel,
    /// Peak hourly severity, 0-100.
    pub severity: u8,
    pub summary: String,
    pub reasons: Vec<String>,
    pub forecast_window: Vec<HourlyObservation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternate_timings: Vec<CandidateWindow>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error("Forecast unavailable: {0}")]
    Forecast(#[from] ForecastError),
    #[error("No forecast data available for the requested event window")]
    NoData,
}

pub struct EventForecastService<S: ForecastSource> {
    source: S,
    config: AppConfig,
}

impl<S: ForecastSource> EventForecastService<S> {
    pub fn new(source: S, config: AppConfig) -> Self {
        EventForecastService { source, config }
    }

    /// Assesses `request` as of the real current time.
    pub fn assess(&self, request: &EventForecastRequest) -> Result<EventForecastResponse, ServiceError> {
        self.assess_at(request, Utc::now())
    }

    /// Assesses `request` as of `now`.
    pub fn assess_at(
        &self,
        request: &EventForecastRequest,
        now: DateTime<Utc>,
    ) -> Result<EventForecastResponse, ServiceError> {
        let tag = request.location.tag();

        validate_location(&request.location)?;
        validate_event_time_at(
            request.start_time,
            request.end_time,
            now,
            self.config.service.max_horizon_days,
        )?;

        logging::info(
            Component::Service,
            Some(&tag),
            &format!(
                "Assessing '{}' from {} to {}",
                request.name,
                request.start_time.to_rfc3339(),
                request.end_time.to_rfc3339()
            ),
        );

        let window = fetch_window(&self.source, &request.location, request.start_time, request.end_time)
            .map_err(|e| {
                logging::log_provider_failure(self.source.component(), &tag, "fetch event window", &e);
                e
            })?;

        if window.is_empty() {
            logging::warn(Component::Service, Some(&tag), "Forecast has no hours inside the event window");
            return Err(ServiceError::NoData);
        }

        let profile = self.config.profile();
        let result = classify_event(&window, &profile);

        let alternates = if request.list_alternates && result.level != RiskLevel::Safe {
            self.alternates(request, now, &tag)
        } else {
            Vec::new()
        };

        logging::log_classification_summary(&tag, window.len(), &result, alternates.len());

        Ok(EventForecastResponse {
            classification: result.level,
            severity: result.severity_pct,
            summary: result.summary,
            reasons: result.reasons,
            forecast_window: window,
            alternate_timings: alternates,
        })
    }

    /// Best start times in the next day. A failed fetch yields none.
    fn alternates(&self, request: &EventForecastRequest, now: DateTime<Utc>, tag: &str) -> Vec<CandidateWindow> {
        let search_end = now + Duration::hours(ALTERNATE_SEARCH_HOURS);
        let hours = match fetch_window(&self.source, &request.location, now, search_end) {
            Ok(hours) => hours,
            Err(e) => {
                logging::log_provider_failure(self.source.component(), tag, "fetch alternate window", &e);
                return Vec::new();
            }
        };

        let duration = event_duration_hours(request.start_time, request.end_time);
        let found = find_top_k_windows(&hours, duration, self.config.service.alternate_count, &self.config.profile());
        logging::debug(
            Component::Service,
            Some(tag),
            &format!("{} alternate window(s) of {} hour(s) found", found.len(), duration),
        );
        found
    }
}
