//! City input handling: debounce, fetch, stale-response guard.

use super::{FormController, lock};
use crate::{
    services::{debounce::Generation, metrics::FormMetrics, weather_api::WeatherApi},
    view::{ElementId, View},
};
use std::sync::{Arc, Mutex};
use tracing::debug;

impl<A: WeatherApi, V: View> FormController<A, V> {
    /// Handle an input event on the city field.
    ///
    /// Queries shorter than the configured minimum clear the list at once and
    /// leave any pending timer alone. Otherwise the pending fetch is replaced
    /// by a new one that fires after the quiet period. Every call starts a
    /// new generation, so responses to earlier input are never applied.
    pub fn on_city_input(&self) {
        let query = self.view.value(ElementId::City).trim().to_string();
        let generation = self.debouncer.advance();

        // Length as a JS string sees it
        if query.encode_utf16().count() < self.config.min_query_len {
            self.view.clear_options(ElementId::CitySuggestions);
            return;
        }

        debug!(query = %query, generation = generation.value(), "Scheduling city suggestions");

        let fetch = SuggestionFetch {
            api: Arc::clone(&self.api),
            view: Arc::clone(&self.view),
            last_query: Arc::clone(&self.last_query),
            metrics: self.metrics.clone(),
            generation,
            query,
        };
        self.debouncer.schedule(fetch.run());
    }
}

/// Everything a fired suggestion timer needs, detached from the controller
struct SuggestionFetch<A, V> {
    api: Arc<A>,
    view: Arc<V>,
    last_query: Arc<Mutex<String>>,
    metrics: Option<FormMetrics>,
    generation: Generation,
    query: String,
}

impl<A: WeatherApi, V: View> SuggestionFetch<A, V> {
    async fn run(self) {
        *lock(&self.last_query) = self.query.clone();
        if let Some(metrics) = &self.metrics {
            metrics.suggest_requests_total.inc();
        }

        let result = self.api.suggest_cities(&self.query).await;

        if !self.is_current() {
            debug!(
                query = %self.query,
                generation = self.generation.value(),
                "Discarding stale city suggestions"
            );
            if let Some(metrics) = &self.metrics {
                metrics.suggest_stale_total.inc();
            }
            return;
        }

        match result {
            Ok(suggestions) => {
                let labels: Vec<String> = suggestions.iter().map(|s| s.label()).collect();
                self.view.replace_options(ElementId::CitySuggestions, &labels);
            }
            Err(e) => {
                self.view.clear_options(ElementId::CitySuggestions);
                debug!(query = %self.query, error = %e, "City suggestions unavailable");
                if let Some(metrics) = &self.metrics {
                    metrics.suggest_failures_total.inc();
                }
            }
        }
    }

    /// The response applies only if no input arrived since it was scheduled
    /// and the field still holds the query that was issued
    fn is_current(&self) -> bool {
        let live = self.view.value(ElementId::City);
        self.generation.is_current()
            && live.trim() == *lock(&self.last_query)
    }
}
