//! Gemini provider implementation.
//!
//! Talks to the Google Generative Language REST API:
//! https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use serde::{Deserialize, Serialize};
use vta_core::{AppError, AppResult};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Models tried in order when the configured model is `auto`.
/// Flash variants come first for their higher free-tier request limits.
pub const PREFERRED_MODELS: [&str; 4] = [
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b-latest",
    "gemini-1.0-pro-latest",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Gemini generation client.
pub struct GeminiClient {
    /// API root, without trailing slash
    base_url: String,

    /// API key sent in the `x-goog-api-key` header
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom API root.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            model.trim_start_matches("models/")
        )
    }

    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system.clone(),
                }],
            }),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    fn convert_response(&self, response: GeminiResponse, requested_model: &str) -> LlmResponse {
        let (content, done) = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                let text = candidate
                    .content
                    .map(|c| {
                        c.parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                let done = candidate
                    .finish_reason
                    .map(|reason| reason != "MAX_TOKENS")
                    .unwrap_or(true);
                (text, done)
            })
            .unwrap_or_default();

        let usage = response
            .usage_metadata
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        LlmResponse {
            content,
            model: response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
            done,
        }
    }
}

/// Pick the first preferred model present in `available`.
///
/// Listed names may carry the `models/` prefix. Falls back to the first
/// preferred model when nothing matches.
pub fn select_model(available: &[String]) -> String {
    PREFERRED_MODELS
        .iter()
        .find(|preferred| {
            available
                .iter()
                .any(|name| name.trim_start_matches("models/") == **preferred)
        })
        .unwrap_or(&PREFERRED_MODELS[0])
        .to_string()
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!("Sending generateContent request to Gemini ({})", request.model);

        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        Ok(self.convert_response(gemini_response, &request.model))
    }

    async fn list_models(&self) -> AppResult<Vec<String>> {
        let url = format!("{}/v1beta/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to list Gemini models: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Llm(format!(
                "Gemini model listing failed ({})",
                response.status()
            )));
        }

        let list: GeminiModelList = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini model list: {}", e)))?;

        Ok(list
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name)
            .collect())
    }
}
