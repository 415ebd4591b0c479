//! Seam over the generative text-completion service.
//!
//! The production implementation talks to OpenRouter through rig. Calls
//! carry an explicit timeout and a bounded retry policy; failures surface
//! as [`AssistantError::Completion`] / [`AssistantError::CompletionTimeout`]
//! instead of propagating raw client errors.

use async_trait::async_trait;
use rig::agent::Agent;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openrouter;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::error::{AssistantError, Result};

const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// One completion round-trip: system preamble + user prompt -> text.
    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String>;
}

/// Runs `attempt_call` under `call_timeout`, retrying up to `max_retries`
/// times. The last failure wins: a provider error becomes `Completion`, an
/// elapsed timer becomes `CompletionTimeout`.
async fn complete_with_retry<F, Fut>(
    call_timeout: Duration,
    max_retries: u32,
    mut attempt_call: F,
) -> Result<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<String, String>>,
{
    let mut last_error = AssistantError::Completion("no attempt made".to_string());

    for attempt in 0..=max_retries {
        match timeout(call_timeout, attempt_call()).await {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(e)) => {
                warn!(attempt, error = %e, "completion call failed");
                last_error = AssistantError::Completion(e);
            }
            Err(_) => {
                warn!(attempt, "completion call timed out");
                last_error = AssistantError::CompletionTimeout(call_timeout);
            }
        }
    }

    Err(last_error)
}

pub struct OpenRouterCompletion {
    api_key: String,
    model: String,
    call_timeout: Duration,
    max_retries: u32,
}

impl OpenRouterCompletion {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Like [`new`](Self::new), with the tuning knobs read from
    /// `COMPLETION_TIMEOUT_SECS` and `COMPLETION_MAX_RETRIES` when set.
    pub fn with_env_overrides(api_key: String) -> Self {
        let mut completion = Self::new(api_key);
        if let Ok(secs) = std::env::var("COMPLETION_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                completion.call_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(retries) = std::env::var("COMPLETION_MAX_RETRIES") {
            if let Ok(retries) = retries.parse::<u32>() {
                completion.max_retries = retries;
            }
        }
        completion
    }

    fn agent(&self, preamble: &str) -> Agent<openrouter::CompletionModel> {
        let client = openrouter::Client::new(&self.api_key);
        client.agent(&self.model).preamble(preamble).build()
    }
}

#[async_trait]
impl CompletionService for OpenRouterCompletion {
    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String> {
        let agent = self.agent(preamble);
        let agent_ref = &agent;
        complete_with_retry(self.call_timeout, self.max_retries, move || async move {
            agent_ref.prompt(prompt).await.map_err(|e| e.to_string())
        })
        .await
    }
}
