//! Command handlers for the Virtual TA CLI.

pub mod ask;
pub mod corpus;
pub mod health;
pub mod info;
pub mod prompts;

pub use ask::AskCommand;
pub use corpus::CorpusCommand;
pub use health::HealthCommand;
pub use info::InfoCommand;
pub use prompts::PromptsCommand;

use serde::Serialize;
use vta_core::{AppError, AppResult};

/// Print `value` as pretty JSON on stdout. Non-ASCII text is written as-is.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
