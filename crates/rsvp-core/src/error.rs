//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The submitted input is missing a field or names an unknown timeslot.
    #[error("{0}")]
    Validation(String),

    /// The requested timeslot has reached its capacity.
    #[error("{0}")]
    SlotFull(String),

    /// A collaborator (sheet store, mail provider) failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors caused by the client's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::SlotFull(_))
    }
}
