//! Service layer: HTTP access, debouncing and metrics.
//!
//! This module contains the resilient HTTP client, the endpoint client
//! built on it, the debounce timer used by autocomplete and the Prometheus
//! collectors.

pub mod debounce;
pub mod metrics;
pub mod resilient_client;
pub mod weather_api;

pub use debounce::*;
pub use metrics::*;
pub use resilient_client::{
    CircuitBreakerConfig, CircuitBreakerState, ResilientClient, ResilientClientConfig,
    ResilientClientError, ResilientClientMetrics, RetryConfig,
};
pub use weather_api::*;
