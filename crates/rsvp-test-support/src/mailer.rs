//! Test mailers — mock `Mailer` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rsvp_core::error::DomainError;
use rsvp_core::mailer::{EmailMessage, Mailer};

/// A configured mailer that records every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    /// Create an empty recording mailer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all messages sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A configured mailer whose every send fails.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, _message: &EmailMessage) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("smtp relay rejected".into()))
    }
}
