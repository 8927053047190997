//! Wire models for the suggestion and weather-stats endpoints.

use serde::{Deserialize, Serialize};

/// A single entry returned by `/api/city-suggest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    /// City name (e.g., "Paris")
    pub name: String,
    /// Country name, empty when the geocoder has none
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl CitySuggestion {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Text shown in the suggestion list: `"<name>, <country>"`
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Query parameters for `/api/weather-stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherQuery {
    /// Trimmed city name
    pub city: String,
    /// Date exactly as entered (the server expects `YYYY-MM-DD`)
    pub date: String,
}

impl WeatherQuery {
    /// Build a query from raw form values.
    ///
    /// The city is trimmed, the date is taken verbatim. Returns `None` when
    /// either is empty.
    pub fn from_form(city: &str, date: &str) -> Option<Self> {
        let city = city.trim();
        if city.is_empty() || date.is_empty() {
            return None;
        }
        Some(Self {
            city: city.to_string(),
            date: date.to_string(),
        })
    }
}

/// Successful response from `/api/weather-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub date: String,
    pub predicted_tavg: f64,
    pub avg_tavg_7d: f64,
    pub is_forecast: bool,
    pub is_ml_forecast: bool,
}

impl WeatherResult {
    pub fn kind(&self) -> ResultKind {
        ResultKind::classify(self.is_forecast, self.is_ml_forecast)
    }
}

/// Error body sent alongside non-2xx weather-stats responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// The `error` field as message text, if it is truthy.
    ///
    /// Strings are used as is; other truthy values (non-zero numbers, `true`,
    /// arrays, objects) are shown as their JSON text.
    pub fn message(&self) -> Option<String> {
        use serde_json::Value;

        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

/// How the displayed temperature was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Historical,
    Forecast,
    MlForecast,
}

impl ResultKind {
    pub fn classify(is_forecast: bool, is_ml_forecast: bool) -> Self {
        match (is_forecast, is_ml_forecast) {
            (false, _) => ResultKind::Historical,
            (true, false) => ResultKind::Forecast,
            (true, true) => ResultKind::MlForecast,
        }
    }

    /// Label text for the `result-type` element
    pub fn label(&self) -> &'static str {
        match self {
            ResultKind::Historical => "Historical/statistical value",
            ResultKind::Forecast => "Forecasted value",
            ResultKind::MlForecast => "Predicted by ML model",
        }
    }

    /// CSS class for the `result-type` element
    pub fn css_class(&self) -> &'static str {
        match self {
            ResultKind::Historical => "result-type historical",
            ResultKind::Forecast | ResultKind::MlForecast => "result-type forecast",
        }
    }
}
