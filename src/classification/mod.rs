//! Rule-based weather risk classification.
//!
//! Submodules:
//! - `rules`     - the ordered rule table (id, level, predicate, description).
//! - `evaluate`  - per-hour level, reason and severity.
//! - `aggregate` - folds a window of hours into one event-level verdict.
//!
//! Everything here is pure: no I/O, no logging, no shared state. The severity
//! profile is always an explicit argument.

pub mod aggregate;
pub mod evaluate;
pub mod rules;

pub use aggregate::classify_event;
pub use evaluate::{compute_severity, evaluate_hour};
