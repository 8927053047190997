//! Prometheus collectors for the form's two request flows.

use crate::services::resilient_client::ResilientClientMetrics;
use prometheus::{Counter, CounterVec, Opts, Registry, TextEncoder};

/// Counters for autocomplete and submission activity
#[derive(Clone)]
pub struct FormMetrics {
    pub registry: Registry,
    pub suggest_requests_total: Counter,
    pub suggest_stale_total: Counter,
    pub suggest_failures_total: Counter,
    pub submissions_total: CounterVec,
    pub client: ResilientClientMetrics,
}

impl FormMetrics {
    /// Create a collector set in a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let suggest_requests_total = Counter::new(
            "weather_form_suggest_requests_total",
            "City suggestion requests issued after the debounce window",
        )?;

        let suggest_stale_total = Counter::new(
            "weather_form_suggest_stale_total",
            "City suggestion responses discarded because the input changed",
        )?;

        let suggest_failures_total = Counter::new(
            "weather_form_suggest_failures_total",
            "City suggestion requests that failed and cleared the list",
        )?;

        let submissions_total = CounterVec::new(
            Opts::new(
                "weather_form_submissions_total",
                "Form submissions by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(suggest_requests_total.clone()))?;
        registry.register(Box::new(suggest_stale_total.clone()))?;
        registry.register(Box::new(suggest_failures_total.clone()))?;
        registry.register(Box::new(submissions_total.clone()))?;

        let client = ResilientClientMetrics::new(&registry)?;

        Ok(Self {
            registry,
            suggest_requests_total,
            suggest_stale_total,
            suggest_failures_total,
            submissions_total,
            client,
        })
    }

    pub fn record_submission(&self, outcome: &str) {
        self.submissions_total.with_label_values(&[outcome]).inc();
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
