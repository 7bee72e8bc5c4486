pub mod agents;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod router;
pub mod services;
pub mod state;
pub mod workers;

pub use catalog::AnswerCatalog;
pub use config::Config;
pub use error::{Error, Result};
pub use router::build_router;
pub use services::completion::{CompletionGateway, CompletionOptions, CompletionResult};
pub use services::history::SessionHistory;
pub use state::AppState;

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    Ok(Config::load()?)
}
