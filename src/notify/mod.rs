//! Notification transport
//!
//! The core only needs `push(text) -> success | failure`; all LINE-specific
//! conditions (missing credential, invalid recipient, expired token) are
//! classified here and surfaced as typed errors for logging.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.line.me/v2/bot/message/push";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification credential not configured: {0}")]
    CredentialMissing(&'static str),
    #[error("LINE rejected the channel token (401) - invalid, expired or revoked")]
    AuthRejected,
    #[error("LINE rejected the recipient (HTTP {0}) - user id invalid or user has not added the bot")]
    InvalidRecipient(u16),
    #[error("LINE API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one text message to the configured recipient.
    async fn push(&self, text: &str) -> Result<(), NotifyError>;
}

/// LINE Messaging API push transport.
pub struct LineNotifier {
    channel_access_token: String,
    user_id: String,
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct PushPayload<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

impl LineNotifier {
    pub fn new(channel_access_token: String, user_id: String) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), channel_access_token, user_id)
    }

    pub fn with_endpoint(endpoint: String, channel_access_token: String, user_id: String) -> Self {
        Self {
            channel_access_token,
            user_id,
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn push(&self, text: &str) -> Result<(), NotifyError> {
        if self.channel_access_token.trim().is_empty() {
            return Err(NotifyError::CredentialMissing("CHANNEL_ACCESS_TOKEN"));
        }
        if self.user_id.trim().is_empty() {
            return Err(NotifyError::CredentialMissing("USER_ID"));
        }

        let payload = PushPayload {
            to: self.user_id.trim(),
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.channel_access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(NotifyError::AuthRejected),
            s @ (400 | 404) => Err(NotifyError::InvalidRecipient(s)),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(NotifyError::Api { status: s, body })
            }
        }
    }
}
