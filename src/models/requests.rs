use crate::catalog::{ResourceLink, RoleEntry};
use crate::services::completion::{CompletionOptions, CompletionResult};
use crate::services::history::HistoryEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role as listed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSummary {
    pub name: String,
    pub description: String,
    pub resources: Vec<ResourceLink>,
    pub question_count: usize,
}

impl From<&RoleEntry> for RoleSummary {
    fn from(entry: &RoleEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            description: entry.description().to_string(),
            resources: entry.resources().to_vec(),
            question_count: entry.question_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub role: String,
    pub questions: Vec<String>,
}

/// Query string for canned-answer lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerQuery {
    pub role: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub role: String,
    pub question: String,
    /// Canned answer, verbatim (may contain HTML links and list markup)
    pub answer: String,
}

/// HTTP API request for a free-text question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub role: String,
    pub question: String,
    /// Existing session to record the exchange in; a new one is created when absent
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub options: CompletionOptions,
}

/// Result of a free-text question. `result` carries the `status` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub session_id: Uuid,
    pub role: String,
    pub question: String,
    #[serde(flatten)]
    pub result: CompletionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub session_id: Uuid,
    pub discarded_entries: usize,
}
