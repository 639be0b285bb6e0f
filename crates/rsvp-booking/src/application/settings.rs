//! Runtime settings for the booking handlers.

use std::str::FromStr;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::confirmation_email::EventDetails;
use crate::domain::timeslot::TimeslotCatalog;

/// How the capacity check, number assignment and append are isolated from
/// concurrent submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyMode {
    /// Submissions within this process run the read-decide-append sequence
    /// one at a time. Other processes writing the same table can still race.
    #[default]
    Serialized,
    /// No isolation; concurrent submissions may overshoot capacity or share a
    /// sequence number.
    BestEffort,
}

impl FromStr for ConsistencyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serialized" => Ok(Self::Serialized),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(format!(
                "unknown consistency mode '{other}' (expected serialized or best_effort)"
            )),
        }
    }
}

/// When the confirmation email is sent relative to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailDelivery {
    /// Sent before the response is returned.
    #[default]
    Inline,
    /// Handed to a detached task; the response does not wait for it.
    Background,
}

impl FromStr for EmailDelivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "background" => Ok(Self::Background),
            other => Err(format!(
                "unknown email delivery '{other}' (expected inline or background)"
            )),
        }
    }
}

/// Names the ranges of the RSVP table inside the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    sheet_name: String,
}

impl TableLayout {
    /// Layout for the tab called `sheet_name`.
    #[must_use]
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// All five record columns.
    #[must_use]
    pub fn records_range(&self) -> String {
        format!("{}!A:E", self.sheet_name)
    }

    /// The sequence-number column only.
    #[must_use]
    pub fn sequence_range(&self) -> String {
        format!("{}!A:A", self.sheet_name)
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::new("Sheet1")
    }
}

/// Everything the handlers need besides their collaborators.
#[derive(Debug)]
pub struct BookingSettings {
    /// Recognized timeslots and their limits.
    pub catalog: TimeslotCatalog,
    /// Where records live in the spreadsheet.
    pub layout: TableLayout,
    /// Event details for confirmation emails.
    pub event: EventDetails,
    /// Email sequencing.
    pub email_delivery: EmailDelivery,
    consistency: ConsistencyMode,
    submission_gate: Mutex<()>,
}

impl BookingSettings {
    /// Creates settings.
    #[must_use]
    pub fn new(
        catalog: TimeslotCatalog,
        layout: TableLayout,
        event: EventDetails,
        consistency: ConsistencyMode,
        email_delivery: EmailDelivery,
    ) -> Self {
        Self {
            catalog,
            layout,
            event,
            email_delivery,
            consistency,
            submission_gate: Mutex::new(()),
        }
    }

    /// The configured consistency mode.
    #[must_use]
    pub fn consistency(&self) -> ConsistencyMode {
        self.consistency
    }

    /// Enters the submission critical section when running `Serialized`.
    pub(crate) async fn enter_submission(&self) -> Option<MutexGuard<'_, ()>> {
        match self.consistency {
            ConsistencyMode::Serialized => Some(self.submission_gate.lock().await),
            ConsistencyMode::BestEffort => None,
        }
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self::new(
            TimeslotCatalog::default(),
            TableLayout::default(),
            EventDetails::default(),
            ConsistencyMode::default(),
            EmailDelivery::default(),
        )
    }
}
