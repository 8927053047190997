//! Client for the city suggestion and weather-stats endpoints.

use crate::{
    error::FetchError,
    models::{ApiErrorBody, CitySuggestion, WeatherQuery, WeatherResult},
    services::resilient_client::ResilientClient,
};
use async_trait::async_trait;
use tracing::{debug, warn};

pub const CITY_SUGGEST_PATH: &str = "/api/city-suggest";
pub const WEATHER_STATS_PATH: &str = "/api/weather-stats";

/// The two endpoints the form depends on
#[async_trait]
pub trait WeatherApi: Send + Sync + 'static {
    /// `GET /api/city-suggest?query=<query>`; any non-2xx is an error
    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, FetchError>;

    /// `GET /api/weather-stats?city=<city>&date=<date>`
    async fn weather_stats(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError>;
}

/// [`WeatherApi`] over HTTP through a [`ResilientClient`]
pub struct HttpWeatherApi {
    client: ResilientClient,
    base_url: String,
}

impl HttpWeatherApi {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    /// The query is percent-encoded
    pub fn suggest_url(&self, query: &str) -> String {
        format!(
            "{}{}?query={}",
            self.base_url,
            CITY_SUGGEST_PATH,
            urlencoding::encode(query)
        )
    }

    /// The city is percent-encoded, the date is passed through as entered
    pub fn weather_url(&self, query: &WeatherQuery) -> String {
        format!(
            "{}{}?city={}&date={}",
            self.base_url,
            WEATHER_STATS_PATH,
            urlencoding::encode(&query.city),
            query.date
        )
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, FetchError> {
        let url = self.suggest_url(query);
        let response = self.client.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(query = %query, status = status.as_u16(), "City suggestion request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let suggestions: Vec<CitySuggestion> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("Failed to parse city suggestions: {e}")))?;

        debug!(query = %query, count = suggestions.len(), "Received city suggestions");
        Ok(suggestions)
    }

    async fn weather_stats(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        let url = self.weather_url(query);
        let response = self.client.get(&url).await?;
        let status = response.status();

        // The body is parsed before the status is looked at: failures carry
        // their message in it.
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_value::<ApiErrorBody>(value)
                .ok()
                .and_then(|body| body.message());
            warn!(
                city = %query.city,
                date = %query.date,
                status = status.as_u16(),
                error = ?message,
                "Weather stats request failed"
            );
            return Err(FetchError::api(message));
        }

        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resilient_client::ResilientClientConfig;

    fn api(base_url: &str) -> HttpWeatherApi {
        let client = ResilientClient::new(ResilientClientConfig::default(), None).unwrap();
        HttpWeatherApi::new(client, base_url)
    }

    #[test]
    fn test_suggest_url_encodes_query() {
        let api = api("http://localhost:8000/");
        assert_eq!(
            api.suggest_url("São Paulo"),
            "http://localhost:8000/api/city-suggest?query=S%C3%A3o%20Paulo"
        );
        assert_eq!(
            api.suggest_url("a&b=c"),
            "http://localhost:8000/api/city-suggest?query=a%26b%3Dc"
        );
    }

    #[test]
    fn test_weather_url_passes_date_verbatim() {
        let api = api("http://localhost:8000");
        let query = WeatherQuery {
            city: "New York".to_string(),
            date: "2024-01-01".to_string(),
        };
        assert_eq!(
            api.weather_url(&query),
            "http://localhost:8000/api/weather-stats?city=New%20York&date=2024-01-01"
        );
    }
}
