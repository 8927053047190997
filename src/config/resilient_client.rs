//! Configuration for the resilient HTTP client
//!
//! Environment-based overrides on top of the defaults in
//! [`ResilientClientConfig::default`].

use crate::services::resilient_client::{
    CircuitBreakerConfig, ResilientClientConfig, RetryConfig,
};
use std::env;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl ResilientClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            read_timeout_seconds: env_or("RESILIENT_CLIENT_READ_TIMEOUT", defaults.read_timeout_seconds),
            connect_timeout_seconds: env_or(
                "RESILIENT_CLIENT_CONNECT_TIMEOUT",
                defaults.connect_timeout_seconds,
            ),
            retry: RetryConfig::from_env(),
            circuit_breaker: CircuitBreakerConfig::from_env(),
            enable_detailed_logging: env_or(
                "RESILIENT_CLIENT_DETAILED_LOGGING",
                defaults.enable_detailed_logging,
            ),
        }
    }
}

impl RetryConfig {
    /// Load retry configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_attempts: env_or("RESILIENT_CLIENT_RETRY_MAX_ATTEMPTS", defaults.max_attempts),
            initial_delay_ms: env_or(
                "RESILIENT_CLIENT_RETRY_INITIAL_DELAY_MS",
                defaults.initial_delay_ms,
            ),
            max_delay_ms: env_or("RESILIENT_CLIENT_RETRY_MAX_DELAY_MS", defaults.max_delay_ms),
        }
    }
}

impl CircuitBreakerConfig {
    /// Load circuit breaker configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            failure_threshold: env_or(
                "RESILIENT_CLIENT_CB_FAILURE_THRESHOLD",
                defaults.failure_threshold,
            ),
            success_threshold: env_or(
                "RESILIENT_CLIENT_CB_SUCCESS_THRESHOLD",
                defaults.success_threshold,
            ),
            timeout_seconds: env_or("RESILIENT_CLIENT_CB_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    const KEYS: &[&str] = &[
        "RESILIENT_CLIENT_READ_TIMEOUT",
        "RESILIENT_CLIENT_CONNECT_TIMEOUT",
        "RESILIENT_CLIENT_DETAILED_LOGGING",
        "RESILIENT_CLIENT_RETRY_MAX_ATTEMPTS",
        "RESILIENT_CLIENT_RETRY_INITIAL_DELAY_MS",
        "RESILIENT_CLIENT_RETRY_MAX_DELAY_MS",
        "RESILIENT_CLIENT_CB_FAILURE_THRESHOLD",
        "RESILIENT_CLIENT_CB_SUCCESS_THRESHOLD",
        "RESILIENT_CLIENT_CB_TIMEOUT_SECONDS",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_resilient_client_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.read_timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert!(config.enable_detailed_logging);
        assert_eq!(config.retry.max_attempts, 0);
        assert_eq!(config.circuit_breaker.failure_threshold, 0);
    }

    #[test]
    fn test_resilient_client_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        unsafe {
            env::set_var("RESILIENT_CLIENT_READ_TIMEOUT", "2");
            env::set_var("RESILIENT_CLIENT_CONNECT_TIMEOUT", "5");
            env::set_var("RESILIENT_CLIENT_DETAILED_LOGGING", "false");
            env::set_var("RESILIENT_CLIENT_RETRY_MAX_ATTEMPTS", "2");
            env::set_var("RESILIENT_CLIENT_CB_FAILURE_THRESHOLD", "10");
        }

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.read_timeout_seconds, 2);
        assert_eq!(config.connect_timeout_seconds, 5);
        assert!(!config.enable_detailed_logging);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.circuit_breaker.failure_threshold, 10);

        clear_env();
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        unsafe {
            env::set_var("RESILIENT_CLIENT_CB_TIMEOUT_SECONDS", "soon");
        }

        let config = CircuitBreakerConfig::from_env();
        assert_eq!(config.timeout_seconds, 30);

        clear_env();
    }
}
