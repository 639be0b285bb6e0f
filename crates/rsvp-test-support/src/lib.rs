//! Shared test fakes and utilities for the RSVP service.

mod clock;
mod mailer;
mod store;

pub use clock::FixedClock;
pub use mailer::{FailingMailer, RecordingMailer};
pub use store::{AppendFailingSheetStore, FailingSheetStore, InMemorySheetStore, row};
