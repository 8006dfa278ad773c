//! End-to-end question answering.
//!
//! Wires intake, retrieval, the image side-channel, the orchestrator and the
//! validator together. Built once per process; every method takes `&self`
//! so one instance can serve concurrent requests with a single shared quota.

use crate::rag::generate::{GenerationClient, GenerationSettings};
use crate::rag::health::{CorpusHealth, GenerationHealth, HealthReport};
use crate::rag::image::describe_image;
use crate::rag::intake::AskRequest;
use crate::rag::orchestrator::{Orchestrator, Synthesis};
use crate::rag::quota::SharedQuota;
use crate::rag::search::{KeywordRetriever, Retriever};
use crate::rag::types::AskResponse;
use crate::rag::validate::validate_payload;
use crate::store::ContentStore;
use crate::text::truncate_chars;
use crate::types::CorpusSummary;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vta_core::config::{ProviderConfig, DEFAULT_MODEL};
use vta_core::{AppConfig, AppResult};
use vta_llm::providers::select_model;
use vta_llm::{create_client, LlmClient, OllamaClient};
use vta_prompt::load_prompt_or_default;

/// Requests slower than this are logged as warnings.
const SLOW_REQUEST: Duration = Duration::from_secs(25);

/// Model name that asks the provider for its model list.
pub const AUTO_MODEL: &str = "auto";

/// The assembled answer pipeline.
pub struct VirtualTa {
    store: Arc<ContentStore>,
    retriever: Arc<dyn Retriever>,
    orchestrator: Orchestrator,
}

impl VirtualTa {
    pub fn new(
        store: Arc<ContentStore>,
        retriever: Arc<dyn Retriever>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            store,
            retriever,
            orchestrator,
        }
    }

    /// Pipeline over `store` with keyword retrieval.
    pub fn with_generator(
        store: Arc<ContentStore>,
        generator: Option<GenerationClient>,
        quota: SharedQuota,
    ) -> Self {
        let retriever = Arc::new(KeywordRetriever::new(store.clone()));
        Self::new(store, retriever, Orchestrator::new(generator, quota))
    }

    /// Build the pipeline from configuration.
    ///
    /// A provider that cannot be constructed (unknown name, missing key) is
    /// logged and leaves the pipeline answering from fallback only. Corpus
    /// and prompt problems are startup errors.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let store = Arc::new(ContentStore::load(config)?);
        let prompt = load_prompt_or_default(&config.workspace)?;
        let quota = SharedQuota::from_config(&config.assistant);

        let generator = match build_client(config) {
            Ok(client) => {
                let model = resolve_model(client.as_ref(), &config.model).await;
                tracing::info!(
                    "Generation enabled: provider={}, model={}",
                    client.provider_name(),
                    model
                );
                let settings = GenerationSettings::from_config(model, &config.assistant);
                Some(GenerationClient::new(client, prompt, settings))
            }
            Err(e) => {
                tracing::warn!("Generation unavailable ({}), using fallback answers only", e);
                None
            }
        };

        Ok(Self::with_generator(store, generator, quota))
    }

    /// Handle a raw JSON request body.
    pub async fn handle_json(&self, body: &str) -> AskResponse {
        match AskRequest::from_json(body) {
            Ok(request) => self.ask(&request).await,
            Err(rejected) => rejected,
        }
    }

    /// Answer one request.
    pub async fn ask(&self, request: &AskRequest) -> AskResponse {
        let start = Instant::now();

        let question = match request.validate() {
            Ok(question) => question,
            Err(rejected) => {
                tracing::info!("Rejected question: {}", rejected.payload.answer);
                return rejected;
            }
        };

        tracing::info!("Processing question: {}", truncate_chars(question, 100));

        let context = self.retriever.score_and_select(question);
        tracing::debug!(
            "Context: {} blocks, {} chars",
            context.blocks,
            context.text.chars().count()
        );

        let image_context = request.image().map(describe_image);

        let Synthesis { payload, source } = self
            .orchestrator
            .respond(question, &context, image_context.as_deref())
            .await;
        let payload = validate_payload(payload);
        if source.is_fallback() {
            tracing::info!("Answer served from fallback ({:?})", source);
        }

        let elapsed = start.elapsed();
        if elapsed > SLOW_REQUEST {
            tracing::warn!(
                "Slow request: {:.2}s ({:?})",
                elapsed.as_secs_f64(),
                source
            );
        } else {
            tracing::info!(
                "Answered in {:.2}s ({:?})",
                elapsed.as_secs_f64(),
                source
            );
        }

        AskResponse::ok(payload)
    }

    pub async fn health(&self) -> HealthReport {
        let quota = self.orchestrator.quota().snapshot().await;
        let summary = self.store.summary();

        HealthReport::new(
            GenerationHealth {
                initialized: self.orchestrator.is_generation_available(),
                provider: self.orchestrator.provider_name(),
                request_count: quota.call_count,
                daily_limit: quota.daily_limit,
            },
            CorpusHealth {
                course_sections: summary.course_sections,
                forum_posts: summary.forum_posts,
            },
        )
    }

    pub fn corpus_summary(&self) -> CorpusSummary {
        self.store.summary()
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }
}

fn build_client(config: &AppConfig) -> Result<Arc<dyn LlmClient>, String> {
    let provider = config.provider.as_str();

    if let Some(ProviderConfig::Ollama {
        endpoint,
        timeout: Some(secs),
        ..
    }) = config.get_provider_config(provider)
    {
        let client = OllamaClient::with_timeout(endpoint, Duration::from_secs(secs))
            .map_err(|e| e.to_string())?;
        return Ok(Arc::new(client));
    }

    create_client(
        provider,
        config.resolve_endpoint(provider).as_deref(),
        config.resolve_api_key(provider).as_deref(),
    )
}

/// Resolve "auto" against the provider's model list.
async fn resolve_model(client: &dyn LlmClient, requested: &str) -> String {
    if requested != AUTO_MODEL {
        return requested.to_string();
    }

    match client.list_models().await {
        Ok(models) if client.provider_name() == "gemini" => select_model(&models),
        Ok(models) => models
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        Err(e) => {
            tracing::warn!("Could not list models ({}), using {}", e, DEFAULT_MODEL);
            DEFAULT_MODEL.to_string()
        }
    }
}
