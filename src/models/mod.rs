//! Data models for the weather form.
//!
//! Request/response shapes exchanged with the suggestion and weather-stats
//! endpoints, plus the presentation classification derived from them.

pub mod api;

pub use api::*;
