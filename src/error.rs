//! Error types for requests issued by the form.

use crate::services::resilient_client::ResilientClientError;

/// Text a browser reports for any low-level fetch failure
pub const FETCH_FAILED: &str = "Failed to fetch";

/// Message shown in place of [`FETCH_FAILED`]
pub const CONNECTION_MESSAGE: &str = "Could not connect to server. Please try again.";

/// Fallback when a failed weather-stats response carries no `error` field
pub const GENERIC_API_ERROR: &str = "API error";

/// Errors produced while talking to the form's endpoints
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure; the detail is logged, never displayed
    #[error("Failed to fetch")]
    Connection(String),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    /// Application-level failure reported by the server
    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Decode(String),
}

impl FetchError {
    /// Build an API error from the server-provided message, if any
    pub fn api(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.is_empty() => FetchError::Api(msg),
            _ => FetchError::Api(GENERIC_API_ERROR.to_string()),
        }
    }

    /// Text for the `error-msg` element
    pub fn display_message(&self) -> String {
        let text = self.to_string();
        if text == FETCH_FAILED {
            CONNECTION_MESSAGE.to_string()
        } else {
            text
        }
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Connection(_) => "network_error",
            FetchError::Status(_) | FetchError::Api(_) => "api_error",
            FetchError::Decode(_) => "decode_error",
        }
    }
}

impl From<ResilientClientError> for FetchError {
    fn from(err: ResilientClientError) -> Self {
        FetchError::Connection(err.to_string())
    }
}
