//! Free-text question handler
//!
//! Forwards a (role, question) pair to the completion gateway and records the
//! exchange in the caller's session history. Provider failures are returned as
//! a `"status": "failed"` body with HTTP 200; only local validation problems
//! produce an error status.

use axum::{Json, extract::State};

use crate::{
    error::{Error, Result},
    models::requests::{AskRequest, AskResponse},
    services::history::HistoryEntry,
    state::AppState,
};

/// Ask an arbitrary question from the perspective of a role
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:3000/api/v1/ask \
///   -H "Content-Type: application/json" \
///   -d '{"role": "I'\''m a Tech Lead", "question": "How do I roll out API versioning?"}'
/// ```
///
/// # Response
/// ```json
/// {
///   "session_id": "0192...",
///   "role": "I'm a Tech Lead",
///   "question": "How do I roll out API versioning?",
///   "status": "succeeded",
///   "text": "...",
///   "model": "openai:gpt-4o-mini",
///   "elapsed_ms": 1834
/// }
/// ```
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    // Unknown sessions are rejected before any provider call
    if let Some(id) = req.session_id {
        if !state.history.contains(&id).await {
            return Err(Error::NotFound(format!("Session {} not found", id)));
        }
    }

    let result = state
        .gateway
        .complete(&req.role, &req.question, &req.options)
        .await?;

    let session_id = match req.session_id {
        Some(id) => id,
        None => state.history.create_session().await,
    };

    // The session may have ended while the provider was answering; the answer
    // is still returned, only its history entry is lost.
    if let Err(e) = state
        .history
        .append(&session_id, HistoryEntry::new(&req.role, &req.question, &result))
        .await
    {
        tracing::warn!(
            session_id = %session_id,
            error = %e,
            "Session ended before the answer could be recorded"
        );
    }

    Ok(Json(AskResponse {
        session_id,
        role: req.role,
        question: req.question,
        result,
    }))
}
