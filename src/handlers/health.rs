//! Health check handler
//!
//! Liveness endpoint for load balancers. It reports only that the process is
//! serving; the catalog and gateway were validated at startup.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Public health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
    /// Number of roles in the loaded catalog
    pub roles: usize,
    /// Sessions currently holding history
    pub active_sessions: usize,
}

/// Public health check handler that returns simple status
///
/// # Example
/// ```bash
/// curl http://localhost:3000/api/v1/health
/// # Returns: {"status":"ok","roles":7,"active_sessions":0}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    tracing::debug!("Health check requested - system operational");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        roles: state.catalog.list_roles().len(),
        active_sessions: state.history.session_count(),
    })
}
