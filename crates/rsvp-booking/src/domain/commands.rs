//! Commands for the booking context.

use rsvp_core::command::Command;
use rsvp_core::error::DomainError;
use uuid::Uuid;

use super::timeslot::{Timeslot, TimeslotCatalog};

/// Reported when the name or the time is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Name and time are required";
/// Reported when the time is not a recognized timeslot.
pub const INVALID_TIMESLOT_MESSAGE: &str = "Invalid time slot";

/// Command to submit an RSVP. Fields arrive exactly as the client sent them.
#[derive(Debug, Clone)]
pub struct SubmitRsvp {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Guest display name.
    pub name: Option<String>,
    /// Requested timeslot label.
    pub time: Option<String>,
    /// Optional address for the confirmation email.
    pub email: Option<String>,
}

/// A submission that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRsvp<'a> {
    /// Trimmed, non-empty name.
    pub name: String,
    /// The catalog entry the submission targets.
    pub timeslot: &'a Timeslot,
    /// Trimmed email, `None` when absent or blank.
    pub email: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl SubmitRsvp {
    /// Checks required fields and timeslot membership.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name or time is missing or
    /// blank, or when the time is not in `catalog`.
    pub fn validate<'a>(
        &self,
        catalog: &'a TimeslotCatalog,
    ) -> Result<ValidatedRsvp<'a>, DomainError> {
        let (Some(name), Some(time)) = (
            non_blank(self.name.as_ref()),
            non_blank(self.time.as_ref()),
        ) else {
            return Err(DomainError::Validation(MISSING_FIELDS_MESSAGE.into()));
        };
        let timeslot = catalog
            .get(time)
            .ok_or_else(|| DomainError::Validation(INVALID_TIMESLOT_MESSAGE.into()))?;

        Ok(ValidatedRsvp {
            name: name.to_owned(),
            timeslot,
            email: non_blank(self.email.as_ref()).map(str::to_owned),
        })
    }
}

impl Command for SubmitRsvp {
    fn command_type(&self) -> &'static str {
        "booking.submit_rsvp"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
