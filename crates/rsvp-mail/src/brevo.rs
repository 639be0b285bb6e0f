//! Brevo transactional email (`POST /v3/smtp/email`).

use async_trait::async_trait;
use rsvp_core::error::DomainError;
use rsvp_core::mailer::{EmailMessage, Mailer};
use serde::Serialize;
use tracing::instrument;

/// Production Brevo endpoint.
pub const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody<'a> {
    sender: BrevoEmailAddress<'a>,
    to: Vec<BrevoEmailAddress<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

/// Brevo credentials and sender identity.
#[derive(Clone, Default)]
pub struct BrevoConfig {
    /// API key; blank disables sending.
    pub api_key: String,
    /// Verified sender address; blank disables sending.
    pub sender_email: String,
    /// Optional display name for the sender.
    pub sender_name: Option<String>,
}

impl std::fmt::Debug for BrevoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoConfig")
            .field("api_key", &"<redacted>")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .finish()
    }
}

/// Sends email through the Brevo HTTP API.
#[derive(Debug, Clone)]
pub struct BrevoMailer {
    http: reqwest::Client,
    config: BrevoConfig,
    endpoint: String,
}

impl BrevoMailer {
    /// Creates a mailer against the production endpoint.
    #[must_use]
    pub fn new(http: reqwest::Client, config: BrevoConfig) -> Self {
        Self::with_endpoint(http, config, BREVO_SEND_URL)
    }

    /// Creates a mailer against a custom endpoint.
    #[must_use]
    pub fn with_endpoint(
        http: reqwest::Client,
        config: BrevoConfig,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty() && !self.config.sender_email.trim().is_empty()
    }

    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.config.sender_email.trim(),
                name: self.config.sender_name.as_deref(),
            },
            to: vec![BrevoEmailAddress {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html_content: &message.html,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("api-key", self.config.api_key.trim())
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("brevo request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(DomainError::Infrastructure(format!(
            "brevo send failed (status={}): {text}",
            status.as_u16()
        )))
    }
}
