//! Weather Form - controller for a city/date weather lookup form
//!
//! The controller collects a city and a date, suggests city names while the
//! user types and submits the pair to a weather-stats endpoint, rendering the
//! result or an error:
//! - Debounced city suggestions with stale-response suppression
//! - One weather-stats request per submission, with guaranteed restoration
//!   of the form controls
//! - Resilient HTTP client with timeouts and circuit breakers
//! - Prometheus metrics and structured logging
//!
//! ## Architecture
//!
//! - `models/` - Request and response shapes of the two endpoints
//! - `controller/` - The form controller and its two event flows
//! - `view/` - The page contract and its in-memory and terminal renderings
//! - `services/` - HTTP access, debouncing and metrics
//! - `config/` - Configuration structures and environment loading
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use weather_form::{ElementId, FormConfig, FormController, MemoryView, ResilientClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reqwest::Error> {
//!     let view = Arc::new(MemoryView::new());
//!     let controller = FormController::connect(
//!         Arc::clone(&view),
//!         FormConfig::from_env(),
//!         ResilientClientConfig::from_env(),
//!         None,
//!     )?;
//!
//!     view.set_value(ElementId::City, "Paris");
//!     view.set_value(ElementId::Date, "2024-01-01");
//!     controller.on_submit().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod view;

pub use config::{FormConfig, MetricsConfig};
pub use controller::{FormController, SubmitOutcome};
pub use error::FetchError;
pub use models::{CitySuggestion, ResultKind, WeatherQuery, WeatherResult};
pub use services::{
    Debouncer, FormMetrics, HttpWeatherApi, ResilientClient, ResilientClientConfig,
    ResilientClientError, WeatherApi,
};
pub use telemetry::{TelemetryConfig, init_tracing};
pub use view::{Document, ElementId, MemoryView, View};
