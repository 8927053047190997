//! Form controller configuration.

use std::env;
use std::time::Duration;

/// Settings for the autocomplete and submission flows
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    /// Origin hosting `/api/city-suggest` and `/api/weather-stats`
    pub base_url: String,
    /// Quiet period before a suggestion request is issued
    pub debounce: Duration,
    /// Minimum trimmed length, in UTF-16 code units, before suggestions are
    /// requested
    pub min_query_len: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            debounce: Duration::from_millis(200),
            min_query_len: 2,
        }
    }
}

impl FormConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("WEATHER_FORM_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let debounce = env::var("WEATHER_FORM_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        let min_query_len = env::var("WEATHER_FORM_MIN_QUERY_LEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.min_query_len);

        Self {
            base_url,
            debounce,
            min_query_len,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    fn clear_env() {
        unsafe {
            env::remove_var("WEATHER_FORM_BASE_URL");
            env::remove_var("WEATHER_FORM_DEBOUNCE_MS");
            env::remove_var("WEATHER_FORM_MIN_QUERY_LEN");
        }
    }

    #[test]
    fn test_form_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = FormConfig::from_env();
        assert_eq!(config, FormConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(200));
        assert_eq!(config.min_query_len, 2);
    }

    #[test]
    fn test_form_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        unsafe {
            env::set_var("WEATHER_FORM_BASE_URL", "https://weather.example.com/");
            env::set_var("WEATHER_FORM_DEBOUNCE_MS", "350");
            env::set_var("WEATHER_FORM_MIN_QUERY_LEN", "3");
        }

        let config = FormConfig::from_env();
        assert_eq!(config.base_url, "https://weather.example.com");
        assert_eq!(config.debounce, Duration::from_millis(350));
        assert_eq!(config.min_query_len, 3);

        clear_env();
    }
}
