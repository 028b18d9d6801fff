//! Structured logging for the event weather guard service
//!
//! Thin helpers over `tracing` that tag every event with the component that
//! produced it and, where relevant, the event location. Provider failures are
//! classified so that expected outages log quietly while unexpected ones
//! surface as errors.
//!
//! The classifier and window search never log; only the ingest and service
//! layers call into this module.

use std::fmt;
use tracing_subscriber::EnvFilter;

use crate::model::{ClassificationResult, ForecastError};

/// Environment variable that switches the subscriber to JSON output.
pub const LOG_JSON_ENV: &str = "EVENTGUARD_LOG_JSON";

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    OpenMeteo,
    Replay,
    Service,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::OpenMeteo => write!(f, "OPEN-METEO"),
            Component::Replay => write!(f, "REPLAY"),
            Component::Service => write!(f, "SVC"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - provider has no data for the requested place or time
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a forecast provider failure
pub fn classify_provider_failure(err: &ForecastError) -> FailureType {
    match err {
        ForecastError::NoDataAvailable(_) => FailureType::Expected,
        // 5xx and malformed bodies point at the provider, not the request
        ForecastError::HttpError(code) if *code >= 500 => FailureType::Unexpected,
        ForecastError::ParseError(_) => FailureType::Unexpected,
        ForecastError::HttpError(_) => FailureType::Unknown,
        ForecastError::RequestFailed(msg) if msg.contains("timed out") => FailureType::Unexpected,
        ForecastError::RequestFailed(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `default_filter` when set. Calling this more than once
/// is harmless: later calls leave the first subscriber in place.
pub fn init_logger(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };

    if result.is_err() {
        debug(Component::System, None, "logger already initialized");
    }
}

/// Reads `EVENTGUARD_LOG_JSON` (`1`/`true` enable JSON output).
pub fn json_requested() -> bool {
    std::env::var(LOG_JSON_ENV)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(component: Component, location: Option<&str>, message: &str) {
    tracing::info!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(component: Component, location: Option<&str>, message: &str) {
    tracing::warn!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(component: Component, location: Option<&str>, message: &str) {
    tracing::error!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(component: Component, location: Option<&str>, message: &str) {
    tracing::debug!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a provider failure with automatic classification
pub fn log_provider_failure(
    component: Component,
    location: &str,
    operation: &str,
    err: &ForecastError,
) -> FailureType {
    let failure_type = classify_provider_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(component, Some(location), &message),
        FailureType::Unexpected => error(component, Some(location), &message),
        FailureType::Unknown => warn(component, Some(location), &message),
    }
    failure_type
}

// ---------------------------------------------------------------------------
// Assessment Summary Logging
// ---------------------------------------------------------------------------

/// Log the outcome of one event assessment
pub fn log_classification_summary(
    location: &str,
    hours: usize,
    result: &ClassificationResult,
    alternates: usize,
) {
    let message = format!(
        "Assessment complete: {} over {} hour(s), severity {}%, {} alternate(s)",
        result.level, hours, result.severity_pct, alternates
    );
    info(Component::Service, Some(location), &message);
}
