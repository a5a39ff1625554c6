//! Configuration for the Direct Line relay client.

use std::time::Duration;

/// Default Direct Line API base URL.
const DIRECT_LINE_BASE_URL: &str = "https://directline.botframework.com/v3/directline";

/// Environment variable holding the shared relay secret.
const SECRET_ENV: &str = "AZURE_DIRECT_LINE_SECRET";

/// Environment variable overriding the relay base URL.
const BASE_URL_ENV: &str = "DIRECT_LINE_BASE_URL";

/// Configuration for the Direct Line relay client.
///
/// Built once at startup and injected into the service; the secret is never
/// re-read from the environment per call.
#[derive(Clone, Debug)]
pub struct DirectLineConfig {
    /// Relay API base URL (no trailing slash).
    pub base_url: String,
    /// Bearer secret for outbound relay calls.
    ///
    /// Deliberately not validated for presence: an empty secret produces an
    /// unauthenticated call that the relay rejects, surfaced through the
    /// standard failure path.
    pub secret: String,
    /// Request timeout for relay calls.
    pub request_timeout: Duration,
    /// Connection timeout for relay calls.
    pub connect_timeout: Duration,
}

impl Default for DirectLineConfig {
    fn default() -> Self {
        Self {
            base_url: DIRECT_LINE_BASE_URL.to_string(),
            secret: String::new(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl DirectLineConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the config from process environment variables.
    ///
    /// `AZURE_DIRECT_LINE_SECRET` supplies the secret (empty if unset);
    /// `DIRECT_LINE_BASE_URL` overrides the relay endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV)
                .unwrap_or_else(|_| DIRECT_LINE_BASE_URL.to_string()),
            secret: std::env::var(SECRET_ENV).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Set the relay base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the relay secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
