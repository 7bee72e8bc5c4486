//! OpenRouter provider implementation (OpenAI-compatible)

use super::{AiProvider, CompletionProvider, CompletionRequest, ProviderError};
use crate::error::{Error, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openrouter::Client;
use secrecy::{ExposeSecret, SecretString};

/// OpenRouter provider (OpenAI-compatible)
///
/// OpenRouter routes to many upstream models through a single API key, so the
/// model name carries the upstream vendor (e.g. `anthropic/claude-3.5-sonnet`).
pub struct OpenRouterProvider {
    client: Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    pub fn new(api_key: &SecretString, base_url: Option<&str>) -> Result<Self> {
        let client = match base_url {
            Some(url) => Client::builder()
                .api_key(api_key.expose_secret())
                .base_url(url)
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create OpenRouter client: {}", e)))?,
            None => Client::new(api_key.expose_secret())
                .map_err(|e| Error::Internal(format!("Failed to create OpenRouter client: {}", e)))?,
        };

        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn provider(&self) -> AiProvider {
        AiProvider::OpenRouter
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
            .map_err(|e| ProviderError::new(AiProvider::OpenRouter, e.to_string()))
    }
}
