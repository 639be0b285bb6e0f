//! Routes for RSVP submission and slot counts.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use rsvp_booking::application::{command_handlers, query_handlers};
use rsvp_booking::domain::commands;
use rsvp_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Message returned with every accepted RSVP.
pub const CONFIRMED_MESSAGE: &str = "RSVP confirmed";

const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Request body for POST /api/rsvp. Every field is optional at this layer so
/// missing values are reported by domain validation rather than by the
/// extractor.
#[derive(Debug, Deserialize)]
pub struct SubmitRsvpRequest {
    /// Guest display name.
    pub name: Option<String>,
    /// Requested timeslot label.
    pub time: Option<String>,
    /// Optional address for the confirmation email.
    pub email: Option<String>,
}

/// Response body for an accepted RSVP.
#[derive(Debug, Serialize)]
pub struct SubmitRsvpResponse {
    /// Always `true`.
    pub success: bool,
    /// Zero-padded confirmation number.
    pub number: String,
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Response body for GET /api/rsvp/counts.
#[derive(Debug, Serialize)]
pub struct CountsResponse {
    /// Always `true`.
    pub success: bool,
    /// Records per recognized timeslot.
    pub counts: BTreeMap<String, u32>,
    /// `true` when the store was unreachable and counts are zero defaults.
    pub degraded: bool,
}

/// GET /api/rsvp/counts
#[instrument(skip(state))]
async fn get_counts(State(state): State<AppState>) -> Json<CountsResponse> {
    let view = query_handlers::get_slot_counts(
        state.store.as_ref(),
        &state.settings.layout,
        &state.settings.catalog,
    )
    .await;

    Json(CountsResponse {
        success: true,
        counts: view.counts,
        degraded: view.degraded,
    })
}

/// POST /api/rsvp
#[instrument(skip(state, payload))]
async fn submit_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRsvpRequest>, JsonRejection>,
) -> Result<Json<SubmitRsvpResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejecting malformed rsvp body");
        DomainError::Validation(INVALID_BODY_MESSAGE.into())
    })?;

    let command = commands::SubmitRsvp {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        time: request.time,
        email: request.email,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_rsvp command");

    let result = command_handlers::handle_submit_rsvp(
        &command,
        &state.settings,
        state.clock.as_ref(),
        state.store.as_ref(),
        state.mailer.clone(),
    )
    .await
    .inspect_err(|e| {
        if e.is_client_error() {
            info!(correlation_id = %command.correlation_id, reason = %e, "rsvp rejected");
        }
    })?;

    Ok(Json(SubmitRsvpResponse {
        success: true,
        number: result.confirmation_number().to_string(),
        message: CONFIRMED_MESSAGE,
    }))
}

/// Returns the router for the RSVP endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rsvp", post(submit_rsvp))
        .route("/api/rsvp/counts", get(get_counts))
}
