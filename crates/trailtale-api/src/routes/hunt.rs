//! Player-facing routes: status, word submission, code scans, reset.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use trailtale_session::application::controller::Confirmation;
use trailtale_session::domain::session::StatusSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/update_input.
#[derive(Debug, Deserialize)]
pub struct UpdateInputRequest {
    /// Slot position within the current checkpoint.
    pub index: usize,
    /// The submitted word or phrase.
    pub value: String,
}

/// Response body for POST /api/update_input and GET /reset.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    /// Always true on success.
    pub success: bool,
}

/// Response body for GET /found/{checkpoint_id}.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FoundResponse {
    /// The awaited code was scanned; the session advanced.
    Advanced {
        /// True when the hunt is now complete.
        completed: bool,
    },
    /// A future code was scanned; nothing changed.
    WrongStep {
        /// The scanned id.
        scanned: u32,
        /// The id the session is waiting for.
        expected: u32,
    },
    /// Idempotent no-op: re-scan, scan during input, or unparseable code.
    Joined,
}

impl From<Confirmation> for FoundResponse {
    fn from(confirmation: Confirmation) -> Self {
        match confirmation {
            Confirmation::Advanced { completed } => Self::Advanced { completed },
            Confirmation::WrongStep { scanned, expected } => {
                Self::WrongStep { scanned, expected }
            }
            Confirmation::Joined => Self::Joined,
        }
    }
}

/// GET /api/status
#[instrument(skip(state))]
async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.controller.status())
}

/// POST /api/update_input
#[instrument(skip(state, request), fields(index = request.index))]
async fn update_input(
    State(state): State<AppState>,
    Json(request): Json<UpdateInputRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    state
        .controller
        .update_slot_value(request.index, &request.value)?;
    Ok(Json(AckResponse { success: true }))
}

/// GET /found/{checkpoint_id}
#[instrument(skip(state))]
async fn found(
    State(state): State<AppState>,
    Path(checkpoint_id): Path<String>,
) -> Json<FoundResponse> {
    let confirmation = state.controller.confirm_checkpoint(&checkpoint_id);
    info!(?confirmation, "checkpoint scan handled");
    Json(confirmation.into())
}

/// GET /reset
#[instrument(skip(state))]
async fn reset(State(state): State<AppState>) -> Json<AckResponse> {
    state.controller.reset();
    info!("session reset");
    Json(AckResponse { success: true })
}

/// Returns the player-facing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/update_input", post(update_input))
        .route("/found/{checkpoint_id}", get(found))
        .route("/reset", get(reset))
}
