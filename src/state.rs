use crate::{
    catalog::AnswerCatalog,
    config::Config,
    error::Result,
    services::{completion::CompletionGateway, history::SessionHistory},
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// The catalog and gateway are built once at startup and only read afterwards.
/// Session history is the only mutable part and is keyed per session.
#[derive(Clone)]
pub struct AppState {
    /// Read-only role → question → answer catalog
    pub catalog: Arc<AnswerCatalog>,
    /// Gateway for free-text questions
    pub gateway: Arc<CompletionGateway>,
    /// Per-session question history
    pub history: Arc<SessionHistory>,
}

impl AppState {
    /// Create a new AppState instance with default session limits
    ///
    /// # Arguments
    /// * `catalog` - Validated answer catalog
    /// * `gateway` - Completion gateway with credentials already checked
    pub fn new(catalog: AnswerCatalog, gateway: CompletionGateway) -> Self {
        Self::with_history(catalog, gateway, SessionHistory::new())
    }

    pub fn with_history(
        catalog: AnswerCatalog,
        gateway: CompletionGateway,
        history: SessionHistory,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            gateway: Arc::new(gateway),
            history: Arc::new(history),
        }
    }

    /// Build state from configuration.
    ///
    /// Fails if the catalog artifact is invalid or the default provider has no
    /// credential; both are fatal startup errors.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = AnswerCatalog::load(config.catalog.path.as_deref())?;
        tracing::info!(
            roles = catalog.list_roles().len(),
            questions = catalog.question_count(),
            "Answer catalog loaded"
        );

        let gateway = CompletionGateway::from_config(&config.ai)?;
        let history = SessionHistory::with_max_entries(config.sessions.max_entries_per_session);

        Ok(Self::with_history(catalog, gateway, history))
    }
}
