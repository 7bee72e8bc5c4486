//! OpenAI provider implementation

use super::{AiProvider, CompletionProvider, CompletionRequest, ProviderError};
use crate::error::{Error, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// OpenAI chat completion provider
pub struct OpenAiProvider {
    client: Client,
    base_url: Option<String>,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("client", &"<OpenAI Client>")
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: &SecretString, base_url: Option<&str>) -> Result<Self> {
        let client = if let Some(url) = base_url {
            tracing::info!(
                base_url = %url,
                "Creating OpenAI provider with custom base URL"
            );
            Client::builder()
                .api_key(api_key.expose_secret())
                .base_url(url)
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create OpenAI client: {}", e)))?
        } else {
            tracing::info!("Creating OpenAI provider with default base URL");
            Client::new(api_key.expose_secret())
                .map_err(|e| Error::Internal(format!("Failed to create OpenAI client: {}", e)))?
        };

        Ok(Self {
            client,
            base_url: base_url.map(str::to_string),
        })
    }

    /// Custom base URL, if one was configured
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider(&self) -> AiProvider {
        AiProvider::OpenAi
    }

    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ProviderError> {
        let agent = self
            .client
            .agent(request.model.as_str())
            .preamble(&request.system_prompt())
            .max_tokens(u64::from(request.max_output_tokens))
            .build();

        agent
            .prompt(request.user_prompt())
            .await
            .map_err(|e| ProviderError::new(AiProvider::OpenAi, e.to_string()))
    }
}
