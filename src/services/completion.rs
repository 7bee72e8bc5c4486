//! Completion gateway for free-text questions.
//!
//! A single call moves through `Idle → Validating → (Rejected | Dispatching) →
//! (Succeeded | Failed)`. Local validation problems are returned as [`Error`];
//! everything that goes wrong on the provider side comes back as
//! [`CompletionResult::Failed`] so callers never see a provider fault as an error.

use crate::agents::expert_system_prompt;
use crate::config::AiConfig;
use crate::error::{Error, Result, ValidationErrors};
use crate::providers::{
    AiProvider, CompletionProvider, CompletionRequest, ModelIdentifier, OpenAiProvider,
    OpenRouterProvider, PromptMessage,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumString};

/// Largest `max_output_tokens` a caller may request.
pub const MAX_OUTPUT_TOKENS_LIMIT: u32 = 4096;

/// Largest caller-supplied timeout, in seconds.
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Shown to users whenever a completion fails, regardless of cause.
pub const APOLOGY_MESSAGE: &str = "Sorry, we couldn't get an answer to your question right now. \
     Please try again in a moment.";

/// States of a single `complete` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CallState {
    Idle,
    Validating,
    Rejected,
    Dispatching,
    Succeeded,
    Failed,
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallState::Rejected | CallState::Succeeded | CallState::Failed
        )
    }
}

/// Per-call settings. Unset fields fall back to the gateway defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// `provider:model` or a bare model name for the default provider.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// What kind of provider-side problem ended the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Transport, authentication, rate limiting or malformed response.
    Provider,
    /// The caller's timeout elapsed before the provider answered.
    Timeout,
    /// The provider answered with nothing but whitespace.
    EmptyResponse,
}

/// A provider-side failure, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFailure {
    pub kind: FailureKind,
    /// Apologetic, non-technical text for the user.
    pub message: String,
    /// Technical detail for logs and operators.
    pub detail: String,
}

impl CompletionFailure {
    fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message: APOLOGY_MESSAGE.to_string(),
            detail: detail.into(),
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionAnswer {
    /// Trimmed, non-empty response text.
    pub text: String,
    /// Model that produced the answer, in `provider:model` form.
    pub model: String,
    pub elapsed_ms: u64,
}

/// Outcome of a dispatched completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionResult {
    Succeeded(CompletionAnswer),
    Failed(CompletionFailure),
}

impl CompletionResult {
    pub fn state(&self) -> CallState {
        match self {
            CompletionResult::Succeeded(_) => CallState::Succeeded,
            CompletionResult::Failed(_) => CallState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Succeeded(_))
    }

    /// Response text on success.
    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionResult::Succeeded(answer) => Some(&answer.text),
            CompletionResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CompletionFailure> {
        match self {
            CompletionResult::Succeeded(_) => None,
            CompletionResult::Failed(failure) => Some(failure),
        }
    }
}

/// Routes role-framed free-text questions to a completion provider.
///
/// Credentials are validated once when the gateway is built; a gateway that
/// exists is always able to dispatch to its default provider.
pub struct CompletionGateway {
    providers: HashMap<AiProvider, Arc<dyn CompletionProvider>>,
    default_model: ModelIdentifier,
    default_max_output_tokens: u32,
    default_timeout: Duration,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<&AiProvider> = self.providers.keys().collect();
        providers.sort_by_key(|p| p.as_str());
        f.debug_struct("CompletionGateway")
            .field("providers", &providers)
            .field("default_model", &self.default_model.to_string())
            .field("default_max_output_tokens", &self.default_max_output_tokens)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl CompletionGateway {
    /// Build a gateway around one provider.
    ///
    /// Fails with [`Error::MissingCredential`] if `default_model` names a
    /// different provider than the one supplied, and with [`Error::Validation`]
    /// if the default token limit or timeout is out of range.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        default_model: ModelIdentifier,
        default_max_output_tokens: u32,
        default_timeout: Duration,
    ) -> Result<Self> {
        let mut providers: HashMap<AiProvider, Arc<dyn CompletionProvider>> = HashMap::new();
        providers.insert(provider.provider(), provider);
        Self::from_providers(
            providers,
            default_model,
            default_max_output_tokens,
            default_timeout,
        )
    }

    fn from_providers(
        providers: HashMap<AiProvider, Arc<dyn CompletionProvider>>,
        default_model: ModelIdentifier,
        default_max_output_tokens: u32,
        default_timeout: Duration,
    ) -> Result<Self> {
        if default_max_output_tokens == 0 || default_max_output_tokens > MAX_OUTPUT_TOKENS_LIMIT {
            return Err(Error::Validation(ValidationErrors::field(
                "ai.max_output_tokens",
                format!("must be between 1 and {}", MAX_OUTPUT_TOKENS_LIMIT),
            )));
        }
        if default_timeout.is_zero() || default_timeout > Duration::from_secs(MAX_TIMEOUT_SECONDS) {
            return Err(Error::Validation(ValidationErrors::field(
                "ai.request_timeout_seconds",
                format!("must be between 1 and {}", MAX_TIMEOUT_SECONDS),
            )));
        }

        if !providers.contains_key(&default_model.provider) {
            return Err(Error::MissingCredential(format!(
                "no API key configured for default provider '{}'",
                default_model.provider
            )));
        }

        Ok(Self {
            providers,
            default_model,
            default_max_output_tokens,
            default_timeout,
        })
    }

    /// Build the production gateway from configuration.
    ///
    /// Every provider with an API key is registered. The default provider must
    /// be among them, otherwise this is a fatal startup error.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let default_provider = AiProvider::from_str(&config.providers.default_provider)
            .map_err(|e| {
                Error::Validation(ValidationErrors::field("ai.providers.default_provider", e))
            })?;
        let default_model = ModelIdentifier::parse(&config.providers.default_model, default_provider)
            .map_err(|e| {
                Error::Validation(ValidationErrors::field("ai.providers.default_model", e))
            })?;

        let mut providers: HashMap<AiProvider, Arc<dyn CompletionProvider>> = HashMap::new();

        if let Some(openai) = &config.providers.openai {
            let provider = OpenAiProvider::new(&openai.api_key, openai.base_url.as_deref())?;
            providers.insert(AiProvider::OpenAi, Arc::new(provider));
        }
        if let Some(openrouter) = &config.providers.openrouter {
            let provider =
                OpenRouterProvider::new(&openrouter.api_key, openrouter.base_url.as_deref())?;
            providers.insert(AiProvider::OpenRouter, Arc::new(provider));
        }

        let gateway = Self::from_providers(
            providers,
            default_model,
            config.max_output_tokens,
            Duration::from_secs(config.request_timeout_seconds),
        )?;

        tracing::info!(
            default_model = %gateway.default_model,
            configured = gateway.providers.len(),
            "Completion gateway ready"
        );

        Ok(gateway)
    }

    /// Register an additional provider, replacing any existing one of the same kind.
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.providers.insert(provider.provider(), provider);
        self
    }

    pub fn default_model(&self) -> &ModelIdentifier {
        &self.default_model
    }

    pub fn is_provider_configured(&self, provider: AiProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Answer a free-text question from the perspective of `role`.
    ///
    /// `role` is used only for prompt framing and is not checked against the
    /// catalog. Blank questions are rejected before any network call.
    pub async fn complete(
        &self,
        role: &str,
        question: &str,
        options: &CompletionOptions,
    ) -> Result<CompletionResult> {
        tracing::debug!(state = %CallState::Validating, role = %role, "Completion call started");

        let (model, request, timeout) = match self.prepare(role, question, options) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::info!(state = %CallState::Rejected, role = %role, error = %e, "Completion rejected");
                return Err(e);
            }
        };

        // prepare() only returns models whose provider is registered
        let provider = self
            .providers
            .get(&model.provider)
            .ok_or_else(|| Error::Internal(format!("provider '{}' vanished", model.provider)))?;

        tracing::debug!(
            state = %CallState::Dispatching,
            role = %role,
            model = %model,
            max_output_tokens = request.max_output_tokens,
            "Dispatching completion request"
        );

        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, provider.complete(&request)).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    CompletionResult::Failed(CompletionFailure::new(
                        FailureKind::EmptyResponse,
                        format!("{} returned an empty response", model),
                    ))
                } else {
                    CompletionResult::Succeeded(CompletionAnswer {
                        text: text.to_string(),
                        model: model.to_string(),
                        elapsed_ms,
                    })
                }
            }
            Ok(Err(e)) => CompletionResult::Failed(CompletionFailure::new(
                FailureKind::Provider,
                e.to_string(),
            )),
            Err(_) => CompletionResult::Failed(CompletionFailure::new(
                FailureKind::Timeout,
                format!("{} did not respond within {:?}", model, timeout),
            )),
        };

        match &result {
            CompletionResult::Succeeded(answer) => tracing::info!(
                state = %CallState::Succeeded,
                role = %role,
                model = %model,
                elapsed_ms,
                chars = answer.text.len(),
                "Completion succeeded"
            ),
            CompletionResult::Failed(failure) => tracing::warn!(
                state = %CallState::Failed,
                role = %role,
                model = %model,
                elapsed_ms,
                kind = %failure.kind,
                detail = %failure.detail,
                "Completion failed"
            ),
        }

        Ok(result)
    }

    /// Validate inputs and build the outbound request.
    fn prepare(
        &self,
        role: &str,
        question: &str,
        options: &CompletionOptions,
    ) -> Result<(ModelIdentifier, CompletionRequest, Duration)> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let max_output_tokens = options
            .max_output_tokens
            .unwrap_or(self.default_max_output_tokens);
        if max_output_tokens == 0 || max_output_tokens > MAX_OUTPUT_TOKENS_LIMIT {
            return Err(Error::Validation(ValidationErrors::field(
                "max_output_tokens",
                format!("must be between 1 and {}", MAX_OUTPUT_TOKENS_LIMIT),
            )));
        }

        let timeout = match options.timeout_seconds {
            Some(0) => {
                return Err(Error::Validation(ValidationErrors::field(
                    "timeout_seconds",
                    "must be at least 1",
                )));
            }
            Some(secs) if secs > MAX_TIMEOUT_SECONDS => {
                return Err(Error::Validation(ValidationErrors::field(
                    "timeout_seconds",
                    format!("must not exceed {}", MAX_TIMEOUT_SECONDS),
                )));
            }
            Some(secs) => Duration::from_secs(secs),
            None => self.default_timeout,
        };

        let model = match options.model.as_deref() {
            Some(raw) => ModelIdentifier::parse(raw, self.default_model.provider)
                .map_err(|e| Error::Validation(ValidationErrors::field("model", e)))?,
            None => self.default_model.clone(),
        };
        if !self.providers.contains_key(&model.provider) {
            return Err(Error::Validation(ValidationErrors::field(
                "model",
                format!("provider '{}' is not configured", model.provider),
            )));
        }

        let request = CompletionRequest {
            model: model.model.clone(),
            messages: vec![
                PromptMessage::system(expert_system_prompt(role)),
                PromptMessage::user(question),
            ],
            max_output_tokens,
        };

        Ok((model, request, timeout))
    }
}
