//! Error types for the Direct Line relay client.

use thiserror::Error;

/// Errors that can occur while talking to the Direct Line API.
#[derive(Debug, Error)]
pub enum DirectLineError {
    /// The relay API answered with a non-success HTTP status.
    #[error("Direct Line API error: {status} {reason}")]
    Upstream {
        /// HTTP status code returned by the relay.
        status: u16,
        /// Canonical reason phrase for the status (empty if unknown).
        reason: String,
    },

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A JSON body could not be parsed.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl DirectLineError {
    /// Build an `Upstream` error from a relay response status.
    #[must_use]
    pub fn upstream(status: reqwest::StatusCode) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Check whether this error came from a relay non-success status.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
