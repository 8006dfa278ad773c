//! Generation provider implementations.

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use gemini::{select_model, GeminiClient, PREFERRED_MODELS};
pub use mock::{MockClient, MockReply};
pub use ollama::OllamaClient;
