use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Default model used for free-text questions, in `provider:model` form.
pub const DEFAULT_MODEL: &str = "openai:gpt-4o-mini";

/// Default upper bound on generated response length.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Default wait for a completion before it is treated as failed.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Sessions untouched for this long are ended by the cleanup worker.
pub const DEFAULT_SESSION_IDLE_TTL_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the free-text completion path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    #[serde(default)]
    pub providers: ProviderConfig,
    /// Applied when a request does not set `max_output_tokens`.
    pub max_output_tokens: u32,
    /// Applied when a request does not set its own timeout.
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub openai: Option<OpenAIConfig>,
    pub openrouter: Option<OpenRouterConfig>,
    pub default_provider: String,
    pub default_model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIConfig {
    #[serde(skip_serializing)]
    pub api_key: SecretString,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    #[serde(skip_serializing)]
    pub api_key: SecretString,
    pub base_url: Option<String>,
}

/// Where the answer catalog comes from. `None` means the embedded artifact.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

/// In-memory session history limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionsConfig {
    /// Idle time after which a session and its history are discarded.
    pub idle_ttl_seconds: u64,
    /// How often the cleanup worker sweeps for idle sessions.
    pub cleanup_interval_seconds: u64,
    /// Entries kept per session; the oldest are dropped beyond this.
    pub max_entries_per_session: usize,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `KNOWLEDGE_HUB__` prefix and `__` separator
            // e.g., KNOWLEDGE_HUB__AI__PROVIDERS__OPENAI__API_KEY="sk-..."
            .add_source(
                config::Environment::with_prefix("KNOWLEDGE_HUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ServerConfig {
    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            providers: ProviderConfig::default(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai: None,
            openrouter: None,
            default_provider: "openai".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_seconds: DEFAULT_SESSION_IDLE_TTL_SECONDS,
            cleanup_interval_seconds: 60,
            max_entries_per_session: crate::services::history::DEFAULT_MAX_ENTRIES_PER_SESSION,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // API keys are skipped via #[serde(skip_serializing)]
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
