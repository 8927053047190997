//! Resilient HTTP client with timeouts, transport retries and circuit breakers.
//!
//! This module provides the HTTP client the form talks through:
//! - Per-request and connect timeouts
//! - Optional exponential backoff with jitter for transport failures only
//! - Circuit breaker per endpoint (host and path), off unless configured
//! - Structured request logging and optional Prometheus metrics
//!
//! HTTP status codes are never retried. A non-2xx response is handed back to
//! the caller untouched so its body can be inspected.

use chrono::{DateTime, Utc};
use prometheus::{CounterVec, GaugeVec, HistogramVec, Opts, Registry};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Configuration for resilient HTTP client
#[derive(Debug, Clone)]
pub struct ResilientClientConfig {
    /// Timeout for a whole request (in seconds)
    pub read_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Circuit breaker configuration
    pub circuit_breaker: CircuitBreakerConfig,

    /// Enable per-attempt logging
    pub enable_detailed_logging: bool,
}

/// Retry configuration for transport failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; zero means a single attempt
    pub max_attempts: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,
}

/// Simple circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit; zero disables the breaker
    pub failure_threshold: usize,

    /// Successes in half-open state that close the circuit
    pub success_threshold: usize,

    /// Time the circuit stays open before a trial call is allowed (in seconds)
    pub timeout_seconds: u64,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 0,
            success_threshold: 1,
            timeout_seconds: 30,
        }
    }
}

/// Circuit breaker state
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitBreakerState {
    fn gauge_value(&self) -> f64 {
        match self {
            CircuitBreakerState::Closed => 0.0,
            CircuitBreakerState::Open => 1.0,
            CircuitBreakerState::HalfOpen => 2.0,
        }
    }
}

/// Simple circuit breaker implementation
#[derive(Debug)]
pub struct SimpleCircuitBreaker {
    state: CircuitBreakerState,
    failure_count: usize,
    success_count: usize,
    config: CircuitBreakerConfig,
    last_failure_time: Option<Instant>,
}

impl SimpleCircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: CircuitBreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            config,
            last_failure_time: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.failure_threshold > 0
    }

    pub fn call_allowed(&mut self) -> bool {
        if !self.is_enabled() {
            return true;
        }
        match self.state {
            CircuitBreakerState::Closed | CircuitBreakerState::HalfOpen => true,
            CircuitBreakerState::Open => match self.last_failure_time {
                Some(last_failure)
                    if last_failure.elapsed() >= Duration::from_secs(self.config.timeout_seconds) =>
                {
                    self.state = CircuitBreakerState::HalfOpen;
                    self.success_count = 0;
                    true
                }
                _ => false,
            },
        }
    }

    pub fn on_success(&mut self) {
        self.failure_count = 0;

        if self.state == CircuitBreakerState::HalfOpen {
            self.success_count += 1;
            if self.success_count >= self.config.success_threshold {
                self.state = CircuitBreakerState::Closed;
            }
        }
    }

    pub fn on_failure(&mut self) {
        self.failure_count += 1;
        self.last_failure_time = Some(Instant::now());

        if !self.is_enabled() {
            return;
        }

        // A failed trial call reopens immediately
        if self.state == CircuitBreakerState::HalfOpen
            || self.failure_count >= self.config.failure_threshold
        {
            self.state = CircuitBreakerState::Open;
        }
    }

    pub fn state(&self) -> &CircuitBreakerState {
        &self.state
    }
}

/// Metrics for resilient HTTP client operations
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// HTTP requests by destination, method, and outcome
    pub http_requests_total: CounterVec,

    /// HTTP request duration by destination and method
    pub http_request_duration_seconds: HistogramVec,

    /// Retry attempts by destination and reason
    pub retry_attempts_total: CounterVec,

    /// Circuit breaker state by endpoint
    pub circuit_breaker_state: GaugeVec,

    /// Timeout occurrences by destination
    pub timeouts_total: CounterVec,
}

impl ResilientClientMetrics {
    /// Create new metrics collector
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let http_requests_total = CounterVec::new(
            Opts::new(
                "resilient_http_requests_total",
                "Total resilient HTTP requests by destination, method, and outcome",
            ),
            &["destination", "method", "outcome"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "resilient_http_request_duration_seconds",
                "Duration of resilient HTTP requests",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["destination", "method"],
        )?;

        let retry_attempts_total = CounterVec::new(
            Opts::new(
                "resilient_http_retry_attempts_total",
                "Total retry attempts by destination and reason",
            ),
            &["destination", "reason"],
        )?;

        let circuit_breaker_state = GaugeVec::new(
            Opts::new(
                "resilient_http_circuit_breaker_state",
                "Circuit breaker state (0=closed, 1=open, 2=half-open)",
            ),
            &["endpoint"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new(
                "resilient_http_timeouts_total",
                "Total timeouts by destination",
            ),
            &["destination"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(retry_attempts_total.clone()))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            retry_attempts_total,
            circuit_breaker_state,
            timeouts_total,
        })
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub destination: String,
    /// Host and path; requests to one endpoint share a circuit breaker
    pub endpoint: String,
    pub method: String,
    pub url: String,
    pub request_id: String,
    pub started_at: DateTime<Utc>,
}

/// Resilient HTTP client shared by every request the form issues
///
/// All methods take `&self`; circuit breaker bookkeeping lives behind a
/// mutex that is never held across an await point.
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
    circuit_breakers: Mutex<HashMap<String, SimpleCircuitBreaker>>,
}

impl ResilientClient {
    /// Create a new resilient HTTP client
    pub fn new(
        config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.read_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
            circuit_breakers: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ResilientClientConfig {
        &self.config
    }

    /// Current breaker state for an endpoint (`host/path`), if one has been created
    pub fn circuit_state(&self, endpoint: &str) -> Option<CircuitBreakerState> {
        self.breakers()
            .get(endpoint)
            .map(|cb| cb.state().clone())
    }

    /// Execute an HTTP GET request.
    ///
    /// Any response that arrives is returned as `Ok`, whatever its status.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ResilientClientError> {
        let context = RequestContext {
            destination: extract_destination(url),
            endpoint: extract_endpoint(url),
            method: "GET".to_string(),
            url: url.to_string(),
            request_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        };

        self.execute(context).await
    }

    fn breakers(&self) -> std::sync::MutexGuard<'_, HashMap<String, SimpleCircuitBreaker>> {
        self.circuit_breakers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn execute(
        &self,
        context: RequestContext,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let destination = context.destination.clone();
        let endpoint = context.endpoint.clone();

        let allowed = {
            let mut breakers = self.breakers();
            let cb = breakers
                .entry(endpoint.clone())
                .or_insert_with(|| SimpleCircuitBreaker::new(self.config.circuit_breaker.clone()));
            let allowed = cb.call_allowed();
            self.record_circuit_breaker_state(&endpoint, cb.state());
            allowed
        };

        if !allowed {
            warn!(
                endpoint = %endpoint,
                url = %context.url,
                request_id = %context.request_id,
                "Circuit breaker is open, rejecting request"
            );
            self.record_request_metrics(&context, "circuit_open", Duration::ZERO);
            return Err(ResilientClientError::CircuitBreakerOpen);
        }

        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
            .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.retry.max_attempts);

        let start = Instant::now();
        let result = Retry::spawn(retry_strategy, || self.attempt(&context)).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                self.record_request_metrics(&context, "success", duration);
                self.update_breaker(&endpoint, true);
            }
            Err(err) => {
                let outcome = match err {
                    ResilientClientError::Timeout => {
                        if let Some(metrics) = &self.metrics {
                            metrics
                                .timeouts_total
                                .with_label_values(&[destination.as_str()])
                                .inc();
                        }
                        "timeout"
                    }
                    ResilientClientError::NetworkError(_) => "network_error",
                    ResilientClientError::CircuitBreakerOpen => "circuit_open",
                };
                warn!(
                    endpoint = %endpoint,
                    request_id = %context.request_id,
                    outcome,
                    error = %err,
                    "{}",
                    err.user_message()
                );
                self.record_request_metrics(&context, outcome, duration);
                self.update_breaker(&endpoint, false);
            }
        }

        result
    }

    /// One attempt; only transport failures come back as `Err`
    async fn attempt(
        &self,
        context: &RequestContext,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let start = Instant::now();
        let request = self
            .client
            .get(&context.url)
            .header(REQUEST_ID_HEADER, context.request_id.as_str());

        match request.send().await {
            Ok(response) => {
                if self.config.enable_detailed_logging {
                    info!(
                        destination = %context.destination,
                        method = %context.method,
                        url = %context.url,
                        request_id = %context.request_id,
                        started_at = %context.started_at.to_rfc3339(),
                        status = response.status().as_u16(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Request completed"
                    );
                }
                Ok(response)
            }
            Err(e) => {
                let reason = if e.is_timeout() { "timeout" } else { "network_error" };
                if let Some(metrics) = &self.metrics {
                    metrics
                        .retry_attempts_total
                        .with_label_values(&[context.destination.as_str(), reason])
                        .inc();
                }
                if self.config.enable_detailed_logging {
                    error!(
                        destination = %context.destination,
                        method = %context.method,
                        url = %context.url,
                        request_id = %context.request_id,
                        started_at = %context.started_at.to_rfc3339(),
                        error = %e,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Request failed with transport error"
                    );
                }
                if e.is_timeout() {
                    Err(ResilientClientError::Timeout)
                } else {
                    Err(ResilientClientError::NetworkError(e))
                }
            }
        }
    }

    fn update_breaker(&self, endpoint: &str, success: bool) {
        let mut breakers = self.breakers();
        if let Some(cb) = breakers.get_mut(endpoint) {
            if success {
                cb.on_success();
            } else {
                cb.on_failure();
            }
            self.record_circuit_breaker_state(endpoint, cb.state());
        }
    }

    fn record_request_metrics(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .http_requests_total
                .with_label_values(&[context.destination.as_str(), context.method.as_str(), outcome])
                .inc();

            metrics
                .http_request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method.as_str()])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_circuit_breaker_state(&self, endpoint: &str, state: &CircuitBreakerState) {
        if let Some(metrics) = &self.metrics {
            metrics
                .circuit_breaker_state
                .with_label_values(&[endpoint])
                .set(state.gauge_value());
        }
    }
}

/// Extract destination (host) from URL for metrics grouping
fn extract_destination(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "invalid_url".to_string())
}

/// Host and path of a URL, the circuit breaker grouping
fn extract_endpoint(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| format!("{}{}", u.host_str().unwrap_or("unknown"), u.path()))
        .unwrap_or_else(|_| "invalid_url".to_string())
}

/// Errors that can occur with the resilient client
#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Circuit breaker is open")]
    CircuitBreakerOpen,
}

impl ResilientClientError {
    /// Human-readable summary for logs
    pub fn user_message(&self) -> String {
        match self {
            ResilientClientError::NetworkError(_) => {
                "Service temporarily unavailable due to network issues".to_string()
            }
            ResilientClientError::Timeout => {
                "Service temporarily unavailable due to timeout".to_string()
            }
            ResilientClientError::CircuitBreakerOpen => {
                "Service temporarily unavailable, please try again later".to_string()
            }
        }
    }
}
