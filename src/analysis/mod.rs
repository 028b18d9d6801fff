//! Forecast analysis built on top of the classifier.
//!
//! Submodules:
//! - `alternate_windows` - searches a day of hours for better event slots.

pub mod alternate_windows;

pub use alternate_windows::find_top_k_windows;
