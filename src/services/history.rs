//! Session-scoped, in-memory history of free-text questions.
//!
//! Each session owns an append-only list of entries. Nothing is persisted and
//! ending a session, explicitly or through idle eviction, discards its entries.

use crate::error::{Error, Result};
use crate::services::completion::CompletionResult;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a recorded question was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryOutcome {
    Answered { answer: String },
    Failed { message: String },
}

impl From<&CompletionResult> for HistoryOutcome {
    fn from(result: &CompletionResult) -> Self {
        match result {
            CompletionResult::Succeeded(answer) => HistoryOutcome::Answered {
                answer: answer.text.clone(),
            },
            CompletionResult::Failed(failure) => HistoryOutcome::Failed {
                message: failure.message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub question: String,
    #[serde(flatten)]
    pub outcome: HistoryOutcome,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: &str, question: &str, result: &CompletionResult) -> Self {
        Self {
            role: role.to_string(),
            question: question.to_string(),
            outcome: HistoryOutcome::from(result),
            created_at: Utc::now(),
        }
    }
}

/// Default number of entries kept per session before the oldest are dropped.
pub const DEFAULT_MAX_ENTRIES_PER_SESSION: usize = 100;

struct Session {
    entries: Vec<HistoryEntry>,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_seen: Utc::now(),
        }
    }
}

/// Per-session history lists keyed by session id.
///
/// Sessions end either explicitly or when the idle sweep finds them untouched
/// for longer than the configured TTL. Each session keeps at most
/// `max_entries` entries; older ones are dropped first.
pub struct SessionHistory {
    sessions: scc::HashMap<Uuid, Session>,
    max_entries: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES_PER_SESSION)
    }

    /// History whose sessions keep at most `max_entries` entries (minimum 1).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            sessions: scc::HashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Start a new, empty session and return its id.
    pub async fn create_session(&self) -> Uuid {
        loop {
            let id = Uuid::now_v7();
            if self.sessions.insert_async(id, Session::new()).await.is_ok() {
                tracing::debug!(session_id = %id, "Session created");
                return id;
            }
        }
    }

    pub async fn contains(&self, session_id: &Uuid) -> bool {
        self.sessions
            .read_async(session_id, |_, _| ())
            .await
            .is_some()
    }

    /// Append an entry to the end of a session's history.
    ///
    /// Returns the number of entries the session now holds.
    pub async fn append(&self, session_id: &Uuid, entry: HistoryEntry) -> Result<usize> {
        let max_entries = self.max_entries;
        self.sessions
            .update_async(session_id, |_, session| {
                session.entries.push(entry);
                if session.entries.len() > max_entries {
                    let overflow = session.entries.len() - max_entries;
                    session.entries.drain(..overflow);
                }
                session.last_seen = Utc::now();
                session.entries.len()
            })
            .await
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", session_id)))
    }

    /// Entries of a session in arrival order.
    pub async fn entries(&self, session_id: &Uuid) -> Result<Vec<HistoryEntry>> {
        self.sessions
            .update_async(session_id, |_, session| {
                session.last_seen = Utc::now();
                session.entries.clone()
            })
            .await
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", session_id)))
    }

    /// End a session, discarding its history. Returns how many entries were dropped.
    pub async fn end_session(&self, session_id: &Uuid) -> Result<usize> {
        let (_, session) = self
            .sessions
            .remove_async(session_id)
            .await
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", session_id)))?;

        tracing::debug!(session_id = %session_id, entries = session.entries.len(), "Session ended");
        Ok(session.entries.len())
    }

    /// End every session not touched within `idle_ttl`. Returns how many were ended.
    pub async fn evict_idle(&self, idle_ttl: TimeDelta) -> usize {
        let now = Utc::now();
        let mut evicted = 0;
        self.sessions
            .retain_async(|_, session| {
                let keep = now - session.last_seen < idle_ttl;
                if !keep {
                    evicted += 1;
                }
                keep
            })
            .await;

        if evicted > 0 {
            tracing::debug!(evicted, "Idle sessions evicted");
        }
        evicted
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}
