//! Admin routes: approving the collected words and debug shortcuts.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for the admin commands.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// Always true on success.
    pub success: bool,
    /// The session phase after the command.
    pub phase: String,
}

/// POST /api/admin/approve_step
#[instrument(skip(state))]
async fn approve_step(State(state): State<AppState>) -> Result<Json<AdminResponse>, ApiError> {
    state.controller.approve_step()?;
    let phase = state.controller.status().phase.as_str().to_owned();
    info!("step approved");
    Ok(Json(AdminResponse {
        success: true,
        phase,
    }))
}

/// POST /api/admin/force_complete
#[instrument(skip(state))]
async fn force_complete(State(state): State<AppState>) -> Json<AdminResponse> {
    state.controller.force_complete();
    let phase = state.controller.status().phase.as_str().to_owned();
    info!("session force-completed");
    Json(AdminResponse {
        success: true,
        phase,
    })
}

/// Returns the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/approve_step", post(approve_step))
        .route("/api/admin/force_complete", post(force_complete))
}
