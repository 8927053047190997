//! The weather form controller.
//!
//! [`FormController`] reacts to two events on the page:
//! - city input ([`FormController::on_city_input`]): debounced city
//!   suggestions with stale-response suppression
//! - form submission ([`FormController::on_submit`]): one weather-stats
//!   request, rendered as a result card or an error message
//!
//! One controller is created per page session. It owns the pending debounce
//! timer and the last issued suggestion query; [`FormController::dispose`]
//! (or dropping the controller) cancels the timer.

mod autocomplete;
mod submit;

pub use submit::SubmitOutcome;

use crate::{
    config::FormConfig,
    services::{
        debounce::Debouncer,
        metrics::FormMetrics,
        resilient_client::{ResilientClient, ResilientClientConfig},
        weather_api::{HttpWeatherApi, WeatherApi},
    },
    view::View,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct FormController<A: WeatherApi, V: View> {
    api: Arc<A>,
    view: Arc<V>,
    config: FormConfig,
    debouncer: Debouncer,
    last_query: Arc<Mutex<String>>,
    submitting: AtomicBool,
    metrics: Option<FormMetrics>,
}

impl<A: WeatherApi, V: View> FormController<A, V> {
    pub fn new(api: Arc<A>, view: Arc<V>, config: FormConfig) -> Self {
        Self {
            api,
            view,
            debouncer: Debouncer::new(config.debounce),
            config,
            last_query: Arc::new(Mutex::new(String::new())),
            submitting: AtomicBool::new(false),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: FormMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&FormMetrics> {
        self.metrics.as_ref()
    }

    /// The query most recently sent to the suggestion endpoint
    pub fn last_issued_query(&self) -> String {
        lock(&self.last_query).clone()
    }

    /// Whether a suggestion fetch is waiting for its quiet period
    pub fn suggestion_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Cancel the pending suggestion fetch and invalidate any in flight
    pub fn dispose(&self) {
        let cancelled = self.debouncer.cancel();
        self.debouncer.advance();
        debug!(cancelled, "Form controller disposed");
    }
}

impl<V: View> FormController<HttpWeatherApi, V> {
    /// Build a controller talking to `config.base_url` over HTTP
    pub fn connect(
        view: Arc<V>,
        config: FormConfig,
        client_config: ResilientClientConfig,
        metrics: Option<FormMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client_metrics = metrics.as_ref().map(|m| m.client.clone());
        let client = ResilientClient::new(client_config, client_metrics)?;
        let api = HttpWeatherApi::new(client, config.base_url.clone());

        let controller = Self::new(Arc::new(api), view, config);
        Ok(match metrics {
            Some(metrics) => controller.with_metrics(metrics),
            None => controller,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
