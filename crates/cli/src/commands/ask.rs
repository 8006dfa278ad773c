//! Ask command handler.
//!
//! Runs one question through the answer pipeline and prints the payload.

use super::print_json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;
use std::path::{Path, PathBuf};
use vta_core::{config::AppConfig, AppError, AppResult};
use vta_knowledge::rag::service_unavailable;
use vta_knowledge::{AskRequest, AskResponse, ResponseStatus, VirtualTa};

/// Answer a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(conflicts_with = "request")]
    pub question: Option<String>,

    /// Raw JSON request body ({"question": ..., "image": ...})
    #[arg(long)]
    pub request: Option<String>,

    /// Read the raw JSON request body from a file
    #[arg(long, conflicts_with_all = ["question", "request"])]
    pub request_file: Option<PathBuf>,

    /// Image to attach: a file path, or base64 text
    #[arg(long, conflicts_with_all = ["request", "request_file"])]
    pub image: Option<String>,

    /// Print the status class alongside the payload
    #[arg(long)]
    pub with_status: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let response = self.respond(config).await?;

        if response.status != ResponseStatus::Ok {
            tracing::warn!(
                "Request rejected ({}): {}",
                response.status.code(),
                response.payload.answer
            );
        }

        if self.with_status {
            print_json(&response)
        } else {
            print_json(&response.payload)
        }
    }

    /// Run the request. A pipeline that fails to start still yields a
    /// server-error payload.
    async fn respond(&self, config: &AppConfig) -> AppResult<AskResponse> {
        let ta = match VirtualTa::from_config(config).await {
            Ok(ta) => ta,
            Err(e) => {
                tracing::error!("Failed to initialize the answer pipeline: {}", e);
                return Ok(service_unavailable());
            }
        };

        let response = match (&self.request, &self.request_file) {
            (Some(body), _) => ta.handle_json(body).await,
            (None, Some(path)) => {
                let body = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("Failed to read request file {:?}: {}", path, e))
                })?;
                ta.handle_json(&body).await
            }
            (None, None) => {
                let mut request = AskRequest::new(self.question.clone().unwrap_or_default());
                if let Some(ref image) = self.image {
                    request = request.with_image(load_image(image)?);
                }
                ta.ask(&request).await
            }
        };

        Ok(response)
    }
}

/// Base64 text for `--image`: a readable file is encoded, anything else is
/// passed through as base64.
fn load_image(image: &str) -> AppResult<String> {
    let path = Path::new(image);
    if path.is_file() {
        let bytes = std::fs::read(path)?;
        tracing::debug!("Attaching image {:?} ({} bytes)", path, bytes.len());
        Ok(STANDARD.encode(bytes))
    } else {
        Ok(image.to_string())
    }
}
