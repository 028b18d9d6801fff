//! Weather risk assessment for scheduled outdoor events.
//!
//! An `EventForecastRequest` names a place and a time span; the service
//! fetches hourly forecasts for that span, classifies it as Safe, Risky or
//! Unsafe, and can propose better start times within the next day. `server`
//! exposes the assessment over HTTP.

pub mod analysis;
pub mod classification;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod profile;
pub mod request;
pub mod server;
pub mod service;
