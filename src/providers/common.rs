//! Common provider types for OpenAI-compatible providers

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Supported AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    OpenRouter,
}

impl AiProvider {
    /// Returns the provider identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::OpenRouter => "openrouter",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "openrouter" => Ok(AiProvider::OpenRouter),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed model identifier with provider and model name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentifier {
    pub provider: AiProvider,
    pub model: String,
}

impl ModelIdentifier {
    /// Parse a model string (supports both "provider:model" and bare "model" formats)
    pub fn parse(input: &str, default_provider: AiProvider) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Model cannot be empty".to_string());
        }

        match input.split_once(':') {
            Some((provider, model)) => {
                let provider = AiProvider::from_str(provider)?;
                if model.trim().is_empty() {
                    return Err(format!("Invalid model format: {}", input));
                }
                Ok(ModelIdentifier {
                    provider,
                    model: model.to_string(),
                })
            }
            None => Ok(ModelIdentifier {
                provider: default_provider,
                model: input.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider.as_str(), self.model)
    }
}

/// Role tag of a message sent to the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// One role-tagged message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Everything a provider needs to run a single completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model name without the provider prefix.
    pub model: String,
    /// Ordered messages: one system instruction followed by the user question.
    pub messages: Vec<PromptMessage>,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    /// Concatenated content of all system messages.
    pub fn system_prompt(&self) -> String {
        self.joined(MessageRole::System)
    }

    /// Concatenated content of all user messages.
    pub fn user_prompt(&self) -> String {
        self.joined(MessageRole::User)
    }

    fn joined(&self, role: MessageRole) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
