//! Multi-provider completion support
//!
//! This module abstracts the external text-completion service behind the
//! [`CompletionProvider`] trait, with OpenAI and OpenRouter implementations.
//! Tests substitute their own implementations of the same trait.

pub mod common;
pub mod openai;
pub mod openrouter;

// Re-export common types
pub use common::{AiProvider, CompletionRequest, MessageRole, ModelIdentifier, PromptMessage};

// Re-export providers
pub use openai::OpenAiProvider;
pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;
use thiserror::Error;

/// A provider-side failure: transport, authentication, rate limiting or a
/// malformed response. Carries the provider's message verbatim.
#[derive(Debug, Clone, Error)]
#[error("{provider} request failed: {message}")]
pub struct ProviderError {
    pub provider: AiProvider,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: AiProvider, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// An external text-completion service.
///
/// Implementations issue exactly one outbound request per call and never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Which provider this is; used for routing `provider:model` identifiers.
    fn provider(&self) -> AiProvider;

    /// Run one completion and return the raw generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
