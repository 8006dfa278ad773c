//! Virtual TA Core Library
//!
//! This crate provides the foundational utilities shared by the Virtual TA crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (provider and assistant settings)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, AssistantConfig, QuotaReset};
pub use error::{AppError, AppResult};
