//! RSVP service — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rsvp_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Message returned for any unexpected failure. Details stay in the logs.
pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again.";

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable or config file value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tracing pipeline could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// The Sheets store could not be constructed.
    #[error("sheets client error: {0}")]
    Sheets(#[from] rsvp_sheets::SheetsError),

    /// The outbound HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self.0 {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            DomainError::SlotFull(msg) => (StatusCode::BAD_REQUEST, "slot_full", msg),
            DomainError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "infrastructure_error",
                    GENERIC_SERVER_ERROR.to_owned(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
