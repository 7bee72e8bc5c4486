//! Test double for the completion provider
//!
//! Records every outbound request and answers according to a fixed behavior,
//! so tests can assert both what was sent and how the gateway normalized it.

use async_trait::async_trait;
use knowledge_hub::providers::{AiProvider, CompletionProvider, CompletionRequest, ProviderError};
use std::sync::Mutex;
use std::time::Duration;

/// How the recording provider responds
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return this text verbatim
    Reply(String),
    /// Fail as if the transport or provider rejected the call
    Fail(String),
    /// Sleep before replying; used to exercise timeouts
    Delay(Duration, String),
}

#[derive(Debug)]
pub struct RecordingProvider {
    provider: AiProvider,
    behavior: Behavior,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingProvider {
    pub fn new(behavior: Behavior) -> Self {
        Self::for_provider(AiProvider::OpenAi, behavior)
    }

    pub fn for_provider(provider: AiProvider, behavior: Behavior) -> Self {
        Self {
            provider,
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Behavior::Reply(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Behavior::Fail(message.to_string()))
    }

    /// Number of outbound calls made so far
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of every recorded request, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    fn provider(&self) -> AiProvider {
        self.provider
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(message) => Err(ProviderError::new(self.provider, message.clone())),
            Behavior::Delay(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
        }
    }
}
