//! Direct Line relay client.
//!
//! This module owns everything that touches the relay API:
//! - Conversation creation
//! - Activity submission (user messages)
//! - Activity listing (with watermark paging)
//! - The in-memory registry of active conversations
//!
//! Every operation is one outbound HTTP call authenticated with the shared
//! bearer secret; there is no retry or backoff.

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::DirectLineConfig;
pub use error::DirectLineError;
pub use registry::ConversationRegistry;
pub use types::{Activity, ChannelAccount, Conversation, ConversationRecord};

/// Client for the Direct Line relay API.
pub struct DirectLineService {
    config: DirectLineConfig,
    client: reqwest::Client,
}

impl DirectLineService {
    /// Create a new relay client with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: DirectLineConfig) -> Result<Self, DirectLineError> {
        let client = Self::build_client(&config)?;
        Ok(Self { config, client })
    }

    /// Build the shared HTTP client with the configured timeouts.
    fn build_client(config: &DirectLineConfig) -> Result<reqwest::Client, DirectLineError> {
        reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| DirectLineError::HttpClient(e.to_string()))
    }

    /// Base URL the client is pointed at.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Create a new conversation on the relay.
    ///
    /// # Errors
    /// Returns `Upstream` for a non-success relay status, or a transport or
    /// parse error for anything else that goes wrong.
    pub async fn start_conversation(&self) -> Result<Conversation, DirectLineError> {
        let url = format!("{}/conversations", self.config.base_url);
        tracing::debug!("Starting conversation via {url}");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectLineError::upstream(response.status()));
        }

        let body = response.text().await?;
        let conversation: Conversation = serde_json::from_str(&body)?;
        Ok(conversation)
    }

    /// Submit an activity to a conversation.
    ///
    /// Returns the relay's raw JSON response body, unmodified.
    ///
    /// # Errors
    /// Returns `Upstream` for a non-success relay status, or a transport
    /// error for anything else that goes wrong.
    pub async fn post_activity(
        &self,
        conversation_id: &str,
        activity: &Activity,
    ) -> Result<String, DirectLineError> {
        let url = format!(
            "{}/conversations/{conversation_id}/activities",
            self.config.base_url
        );
        tracing::debug!("Posting activity to conversation {conversation_id}");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(activity)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectLineError::upstream(response.status()));
        }

        Ok(response.text().await?)
    }

    /// List activities for a conversation, optionally from a watermark.
    ///
    /// Returns the relay's raw JSON response body, unmodified. The watermark
    /// is appended as a query parameter exactly as supplied.
    ///
    /// # Errors
    /// Returns `Upstream` for a non-success relay status, or a transport
    /// error for anything else that goes wrong.
    pub async fn get_activities(
        &self,
        conversation_id: &str,
        watermark: Option<&str>,
    ) -> Result<String, DirectLineError> {
        let url = self.activities_url(conversation_id, watermark)?;
        tracing::debug!("Fetching activities for conversation {conversation_id}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectLineError::upstream(response.status()));
        }

        Ok(response.text().await?)
    }

    /// Build the activity-listing URL with the optional watermark parameter.
    fn activities_url(
        &self,
        conversation_id: &str,
        watermark: Option<&str>,
    ) -> Result<String, DirectLineError> {
        let mut url = url::Url::parse(&format!(
            "{}/conversations/{conversation_id}/activities",
            self.config.base_url
        ))?;

        if let Some(watermark) = watermark {
            url.query_pairs_mut().append_pair("watermark", watermark);
        }

        Ok(url.to_string())
    }

    /// Bearer authorization header value for relay calls.
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.config.secret)
    }
}
