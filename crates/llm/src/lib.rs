//! Generation backend crate for the Virtual TA.
//!
//! This crate provides a provider-agnostic abstraction over the single
//! external text-generation endpoint the answer pipeline talks to.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//! - **Ollama**: Local LLM runtime
//! - **Mock**: Scripted replies for tests and offline runs
//!
//! # Example
//! ```no_run
//! use vta_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("my-api-key");
//! let request = LlmRequest::new("What is a virtual environment?", "gemini-1.5-flash-latest")
//!     .with_temperature(0.7)
//!     .with_top_p(0.8)
//!     .with_max_tokens(500);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, MockClient, MockReply, OllamaClient};
pub use types::ProviderType;
