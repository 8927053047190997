//! Form submission: one weather-stats request per submit.

use super::FormController;
use crate::{
    error::FetchError,
    models::{WeatherQuery, WeatherResult},
    services::weather_api::WeatherApi,
    view::{BUSY_LABEL, ElementId, SUBMIT_LABEL, View},
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// How a submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The result card is showing this result
    Success(WeatherResult),
    /// The error area is showing this error's display message
    Failed(FetchError),
    /// City or date was empty; nothing was requested
    Invalid,
    /// Another submission was still pending; nothing changed
    Busy,
}

impl SubmitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::Success(_) => "success",
            SubmitOutcome::Failed(e) => e.kind(),
            SubmitOutcome::Invalid => "invalid",
            SubmitOutcome::Busy => "busy",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Puts the controls back into their idle state on drop
struct RestoreControls<'a, V: View>(&'a V);

impl<V: View> Drop for RestoreControls<'_, V> {
    fn drop(&mut self) {
        self.0.set_disabled(ElementId::GetWeatherBtn, false);
        self.0.set_text(ElementId::GetWeatherBtn, SUBMIT_LABEL);
        self.0.set_visible(ElementId::Spinner, false);
    }
}

impl<A: WeatherApi, V: View> FormController<A, V> {
    /// Handle a submit event on the form.
    ///
    /// Validation runs before the button is disabled, and the controls are
    /// restored exactly once on every exit path, including cancellation of
    /// the returned future. A submit while another is pending returns
    /// [`SubmitOutcome::Busy`] without touching the page.
    pub async fn on_submit(&self) -> SubmitOutcome {
        let outcome = self.submit().await;
        if let Some(metrics) = &self.metrics {
            metrics.record_submission(outcome.label());
        }
        outcome
    }

    /// Whether a submission is waiting on the weather-stats endpoint
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.submitting) else {
            warn!("Submission ignored, another one is still pending");
            return SubmitOutcome::Busy;
        };

        let view = &*self.view;
        view.set_visible(ElementId::ResultCard, false);
        view.set_visible(ElementId::ErrorMsg, false);
        view.set_visible(ElementId::Spinner, true);
        let _restore = RestoreControls(view);

        let city = view.value(ElementId::City);
        let date = view.value(ElementId::Date);
        let Some(query) = WeatherQuery::from_form(&city, &date) else {
            return SubmitOutcome::Invalid;
        };

        view.set_disabled(ElementId::GetWeatherBtn, true);
        view.set_text(ElementId::GetWeatherBtn, BUSY_LABEL);

        match self.api.weather_stats(&query).await {
            Ok(result) => {
                info!(
                    city = %result.city,
                    date = %result.date,
                    kind = result.kind().label(),
                    "Weather stats received"
                );
                show_result(view, &result);
                SubmitOutcome::Success(result)
            }
            Err(e) => {
                warn!(city = %query.city, date = %query.date, error = %e, "Weather stats request failed");
                view.set_text(ElementId::ErrorMsg, &e.display_message());
                view.set_visible(ElementId::ErrorMsg, true);
                SubmitOutcome::Failed(e)
            }
        }
    }
}

fn show_result<V: View>(view: &V, result: &WeatherResult) {
    let kind = result.kind();
    view.set_text(ElementId::ResultCity, &result.city);
    view.set_text(ElementId::ResultDate, &result.date);
    view.set_text(ElementId::ResultPred, &result.predicted_tavg.to_string());
    view.set_text(ElementId::ResultAvg7d, &result.avg_tavg_7d.to_string());
    view.set_text(ElementId::ResultType, kind.label());
    view.set_class(ElementId::ResultType, kind.css_class());
    view.set_visible(ElementId::ResultCard, true);
}
