//! RSVP records and their row layout in the external table.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use rsvp_core::store::Row;

/// Column holding the sequence number.
pub const SEQUENCE_COLUMN: usize = 0;
/// Column holding the timeslot label.
pub const TIMESLOT_COLUMN: usize = 2;

/// Width confirmation numbers are zero-padded to.
const CONFIRMATION_WIDTH: usize = 3;

/// A confirmation number as shown to guests: `7` renders as `"007"`,
/// values past three digits render at natural width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfirmationNumber(pub u64);

impl fmt::Display for ConfirmationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = CONFIRMATION_WIDTH)
    }
}

/// One accepted RSVP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpRecord {
    /// Sequence number assigned at submission.
    pub sequence_number: u64,
    /// Guest display name.
    pub name: String,
    /// Timeslot label.
    pub timeslot: String,
    /// When the submission was accepted.
    pub submitted_at: DateTime<Utc>,
    /// Optional contact address.
    pub email: Option<String>,
}

impl RsvpRecord {
    /// The guest-facing confirmation number.
    #[must_use]
    pub fn confirmation_number(&self) -> ConfirmationNumber {
        ConfirmationNumber(self.sequence_number)
    }

    /// The row written to the table:
    /// `[number, name, timeslot, timestamp, email]`.
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            self.sequence_number.to_string(),
            self.name.clone(),
            self.timeslot.clone(),
            self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.email.clone().unwrap_or_default(),
        ]
    }
}
