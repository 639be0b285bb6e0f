//! Command handlers for the booking context.
//!
//! `handle_submit_rsvp` orchestrates a submission: validate, check capacity,
//! assign a number, append the row, then send the confirmation email.

use std::sync::Arc;

use rsvp_core::clock::Clock;
use rsvp_core::command::Command;
use rsvp_core::error::DomainError;
use rsvp_core::mailer::{EmailMessage, Mailer};
use rsvp_core::store::SheetStore;
use tracing::{info, warn};

use crate::application::query_handlers;
use crate::application::settings::{BookingSettings, EmailDelivery};
use crate::domain::commands::SubmitRsvp;
use crate::domain::confirmation_email::confirmation_email;
use crate::domain::record::{ConfirmationNumber, RsvpRecord};

/// Reported when the requested slot has no room left.
pub const SLOT_FULL_MESSAGE: &str = "This time slot is full";

/// What happened to the confirmation email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailOutcome {
    /// The guest did not supply an address.
    NotRequested,
    /// No mail provider is configured.
    NotConfigured,
    /// The provider accepted the message.
    Sent,
    /// The provider rejected the message; the RSVP still stands.
    Failed,
    /// Handed to a background task.
    Queued,
}

/// Result of an accepted submission.
#[derive(Debug)]
pub struct SubmissionResult {
    /// The record appended to the table.
    pub record: RsvpRecord,
    /// Confirmation email outcome.
    pub email: EmailOutcome,
}

impl SubmissionResult {
    /// The guest-facing confirmation number.
    #[must_use]
    pub fn confirmation_number(&self) -> ConfirmationNumber {
        self.record.confirmation_number()
    }
}

async fn deliver(mailer: &dyn Mailer, message: &EmailMessage) -> EmailOutcome {
    match mailer.send(message).await {
        Ok(()) => {
            info!(to = %message.to, "confirmation email sent");
            EmailOutcome::Sent
        }
        Err(e) => {
            warn!(to = %message.to, error = %e, "confirmation email failed");
            EmailOutcome::Failed
        }
    }
}

/// Handles the `SubmitRsvp` command.
///
/// Steps 2 to 4 (count, number, append) run inside the settings' submission
/// gate when the consistency mode is `Serialized`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for bad input, `DomainError::SlotFull`
/// when the slot is at capacity, and `DomainError::Infrastructure` if the
/// append fails. Email failures are never returned.
pub async fn handle_submit_rsvp(
    command: &SubmitRsvp,
    settings: &BookingSettings,
    clock: &dyn Clock,
    store: &dyn SheetStore,
    mailer: Arc<dyn Mailer>,
) -> Result<SubmissionResult, DomainError> {
    let rsvp = command.validate(&settings.catalog)?;
    let slot = rsvp.timeslot;

    let record = {
        let _gate = settings.enter_submission().await;

        let counts =
            query_handlers::get_slot_counts(store, &settings.layout, &settings.catalog).await;
        if counts.count(&slot.label) >= slot.capacity {
            info!(
                correlation_id = %command.correlation_id,
                timeslot = %slot.label,
                capacity = slot.capacity,
                "rejecting rsvp: slot full"
            );
            return Err(DomainError::SlotFull(SLOT_FULL_MESSAGE.into()));
        }

        let sequence_number = query_handlers::next_sequence_number(store, &settings.layout).await;
        let record = RsvpRecord {
            sequence_number,
            name: rsvp.name,
            timeslot: slot.label.clone(),
            submitted_at: clock.now(),
            email: rsvp.email,
        };

        store
            .append_rows(&settings.layout.records_range(), vec![record.to_row()])
            .await?;
        record
    };

    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        number = %record.confirmation_number(),
        timeslot = %record.timeslot,
        "rsvp recorded"
    );

    let email = match record.email.as_deref() {
        None => EmailOutcome::NotRequested,
        Some(_) if !mailer.is_configured() => EmailOutcome::NotConfigured,
        Some(to) => {
            let message = confirmation_email(
                to,
                record.confirmation_number(),
                &record.name,
                &record.timeslot,
                &settings.event,
            );
            match settings.email_delivery {
                EmailDelivery::Inline => deliver(mailer.as_ref(), &message).await,
                EmailDelivery::Background => {
                    tokio::spawn(async move {
                        deliver(mailer.as_ref(), &message).await;
                    });
                    EmailOutcome::Queued
                }
            }
        }
    };

    Ok(SubmissionResult { record, email })
}
