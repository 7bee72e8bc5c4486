//! Canned-answer handlers
//!
//! Read-only lookups against the answer catalog. A miss here means the caller
//! asked for something the UI never offered, so it is logged as a warning.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    error::{Error, Result},
    models::requests::{AnswerQuery, AnswerResponse, QuestionsResponse, RoleSummary, RolesResponse},
    state::AppState,
};

/// List every role with its description, related links and question count
///
/// # Example
/// ```bash
/// curl http://localhost:3000/api/v1/roles
/// ```
pub async fn list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles = state.catalog.roles().map(RoleSummary::from).collect();
    Json(RolesResponse { roles })
}

/// List the canned questions for one role
///
/// # Example
/// ```bash
/// curl "http://localhost:3000/api/v1/roles/I'm%20a%20Tech%20Lead/questions"
/// ```
pub async fn list_questions(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<QuestionsResponse>> {
    let questions = state
        .catalog
        .list_questions(&role)
        .inspect_err(|_| tracing::warn!(role = %role, "Questions requested for unknown role"))?
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(QuestionsResponse { role, questions }))
}

/// Resolve a (role, question) pair to its canned answer
///
/// # Example
/// ```bash
/// curl -G http://localhost:3000/api/v1/answers \
///   --data-urlencode "role=I'm an API Designer" \
///   --data-urlencode "question=Which naming conventions promote intuitive API design?"
/// ```
pub async fn get_answer(
    State(state): State<AppState>,
    Query(query): Query<AnswerQuery>,
) -> Result<Json<AnswerResponse>> {
    let answer = match state.catalog.get_answer(&query.role, &query.question) {
        Ok(answer) => answer.to_string(),
        Err(e @ Error::UnknownQuestion { .. }) => {
            tracing::warn!(
                role = %query.role,
                question = %query.question,
                registered_under = ?state.catalog.roles_with_question(&query.question),
                "Canned answer requested for unregistered question"
            );
            return Err(e);
        }
        Err(e) => {
            tracing::warn!(role = %query.role, "Canned answer requested for unknown role");
            return Err(e);
        }
    };

    Ok(Json(AnswerResponse {
        role: query.role,
        question: query.question,
        answer,
    }))
}
