//! Decides between generation and fallback for each question.

use crate::rag::fallback::{category_fallback, context_fallback};
use crate::rag::generate::GenerationClient;
use crate::rag::quota::{QuotaDecision, SharedQuota};
use crate::rag::sources::extract_links;
use crate::rag::types::{AnswerPayload, AnswerSource, Context};
use crate::rag::validate::{clean_answer_text, validate_payload};

/// Generated answers containing this phrase are provider-side fallbacks.
const UNUSABLE_PHRASE: &str = "currently unable to process";

/// An answer and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub payload: AnswerPayload,
    pub source: AnswerSource,
}

/// Rate-limited orchestrator.
///
/// Without a generation client every question gets the category fallback
/// and the quota is never touched.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Option<GenerationClient>,
    quota: SharedQuota,
}

impl Orchestrator {
    /// Every provider call made by `generator` is paced through `quota`.
    pub fn new(generator: Option<GenerationClient>, quota: SharedQuota) -> Self {
        let generator = generator.map(|generator| generator.with_throttle(quota.clone()));
        Self { generator, quota }
    }

    pub fn is_generation_available(&self) -> bool {
        self.generator.is_some()
    }

    pub fn provider_name(&self) -> Option<String> {
        self.generator
            .as_ref()
            .map(|generator| generator.provider_name().to_string())
    }

    pub fn quota(&self) -> &SharedQuota {
        &self.quota
    }

    /// Answer `question`, always producing a contract-compliant payload.
    pub async fn answer(
        &self,
        question: &str,
        context: &Context,
        image_context: Option<&str>,
    ) -> AnswerPayload {
        self.respond(question, context, image_context).await.payload
    }

    pub async fn respond(
        &self,
        question: &str,
        context: &Context,
        image_context: Option<&str>,
    ) -> Synthesis {
        let Some(generator) = &self.generator else {
            tracing::warn!("Generation unavailable, answering from fallback");
            return Synthesis {
                payload: category_fallback(question),
                source: AnswerSource::CategoryFallback,
            };
        };

        match self.quota.acquire().await {
            QuotaDecision::Exhausted { .. } => {
                return fallback(question, context);
            }
            QuotaDecision::Granted { call_number } => {
                tracing::debug!(
                    "Generation call {} via {}",
                    call_number,
                    generator.provider_name()
                );
            }
        }

        match generator.generate(question, &context.text, image_context).await {
            Ok(raw) => {
                let answer = clean_answer_text(&raw);
                if answer.to_lowercase().contains(UNUSABLE_PHRASE) {
                    tracing::warn!("Generated answer is a provider fallback, discarding");
                    return fallback(question, context);
                }
                Synthesis {
                    payload: validate_payload(AnswerPayload::new(
                        answer,
                        extract_links(&context.text, question),
                    )),
                    source: AnswerSource::Generated,
                }
            }
            Err(failure) => {
                tracing::warn!("Generation failed: {}", failure);
                fallback(question, context)
            }
        }
    }
}

fn fallback(question: &str, context: &Context) -> Synthesis {
    Synthesis {
        payload: context_fallback(question, context),
        source: AnswerSource::ContextFallback,
    }
}
