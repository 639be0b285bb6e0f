//! Outbound email abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// A single HTML email to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Sends transactional email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Whether credentials are present. Unconfigured mailers are never called.
    fn is_configured(&self) -> bool;

    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError>;
}

/// Mailer used when no email credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn send(&self, _message: &EmailMessage) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure(
            "email delivery is not configured".into(),
        ))
    }
}
