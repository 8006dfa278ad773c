//! Prompt system for the Virtual TA.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, overridable per workspace
//! - A built-in teaching-assistant answer template
//! - Handlebars template rendering
//! - Bounded course-context and image-context injection

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt, load_prompt_or_default};
pub use types::{
    default_answer_prompt, BuiltPrompt, BuiltPromptMetadata, PromptContextConfig,
    PromptDefinition, ANSWER_PROMPT_ID,
};
