use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::Result,
    models::requests::{EndSessionResponse, HistoryResponse, SessionResponse},
    state::AppState,
};

/// Start a new session with an empty history
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.history.create_session().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// Questions asked in a session, oldest first
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>> {
    let entries = state.history.entries(&session_id).await?;
    Ok(Json(HistoryResponse {
        session_id,
        entries,
    }))
}

/// End a session and discard its history
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EndSessionResponse>> {
    let discarded_entries = state.history.end_session(&session_id).await?;
    tracing::info!(session_id = %session_id, discarded_entries, "Session ended by client");
    Ok(Json(EndSessionResponse {
        session_id,
        discarded_entries,
    }))
}
