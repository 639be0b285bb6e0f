//! Errors raised while talking to the Sheets API.

use rsvp_core::error::DomainError;
use thiserror::Error;

/// Failures of the Sheets client and its token exchange.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The service-account key could not be used to sign an assertion.
    #[error("invalid service account key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    /// Transport failure or undecodable response body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{context} failed with status {status}: {body}")]
    Status {
        /// Which call failed.
        context: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The configured base URL cannot carry path segments.
    #[error("invalid api url: {0}")]
    Url(String),
}

impl From<SheetsError> for DomainError {
    fn from(err: SheetsError) -> Self {
        DomainError::Infrastructure(err.to_string())
    }
}
