//! Generation client: prompt construction and bounded retries around one
//! provider call.
//!
//! This is the only pipeline component that reports failure; callers branch
//! on it to choose the fallback path.

use crate::rag::quota::SharedQuota;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use vta_core::AssistantConfig;
use vta_llm::{LlmClient, LlmRequest};
use vta_prompt::{build_prompt, PromptDefinition};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.8;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Why a generation call produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// The provider reported rate or quota exhaustion; retries were skipped.
    #[error("quota exhausted after {attempts} attempt(s): {message}")]
    Quota { attempts: u32, message: String },

    /// Every attempt failed or came back empty.
    #[error("generation failed after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// The prompt template could not be rendered.
    #[error("prompt could not be built: {0}")]
    Prompt(String),
}

/// Sampling and retry settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_attempts: 2,
            retry_backoff: Duration::from_secs(1),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn from_config(model: impl Into<String>, config: &AssistantConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            retry_backoff: config.retry_backoff(),
            ..Self::new(model)
        }
    }
}

/// True when a provider error reads like rate or quota exhaustion.
pub fn is_quota_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ["429", "quota", "exceeded"]
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Wraps a provider with the answer prompt and the retry policy.
#[derive(Clone)]
pub struct GenerationClient {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    settings: GenerationSettings,
    /// Throttle applied to every attempt, retries included
    throttle: Option<SharedQuota>,
}

impl GenerationClient {
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            prompt,
            settings,
            throttle: None,
        }
    }

    /// Pace every provider call through `quota`.
    pub fn with_throttle(mut self, quota: SharedQuota) -> Self {
        self.throttle = Some(quota);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate an answer for `question` grounded in `context`.
    pub async fn generate(
        &self,
        question: &str,
        context: &str,
        image_context: Option<&str>,
    ) -> Result<String, GenerationFailure> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());

        let built = build_prompt(&self.prompt, variables, Some(context), image_context)
            .map_err(|e| GenerationFailure::Prompt(e.to_string()))?;

        tracing::debug!(
            "Built prompt '{}' ({} context chars, image: {})",
            built.metadata.source_prompt_id,
            built.metadata.context_chars,
            built.metadata.image_context_included
        );

        let mut request = LlmRequest::new(built.user, self.settings.model.clone())
            .with_temperature(self.settings.temperature)
            .with_top_p(self.settings.top_p)
            .with_max_tokens(self.settings.max_output_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let outcome = match &self.throttle {
                Some(quota) => quota.paced(self.client.complete(&request)).await,
                None => self.client.complete(&request).await,
            };

            match outcome {
                Ok(response) => {
                    let text = response.content.trim();
                    if !text.is_empty() {
                        tracing::debug!(
                            "Generation succeeded on attempt {} ({} tokens)",
                            attempt,
                            response.usage.total_tokens
                        );
                        return Ok(text.to_string());
                    }
                    tracing::warn!("Generation attempt {} returned no text", attempt);
                    last_error = "empty response".to_string();
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!("Generation attempt {} failed: {}", attempt, message);

                    if is_quota_error(&message) {
                        tracing::warn!("Quota exceeded, stopping retries");
                        return Err(GenerationFailure::Quota {
                            attempts: attempt,
                            message,
                        });
                    }
                    last_error = message;
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.settings.retry_backoff).await;
            }
        }

        Err(GenerationFailure::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}
