//! Prompts command handler.
//!
//! Lists the prompt definitions found under `.vta/prompts/` and reports
//! which answer prompt the pipeline will use.

use super::print_json;
use clap::Args;
use serde::Serialize;
use vta_core::{config::AppConfig, AppResult};
use vta_prompt::{list_prompts, ANSWER_PROMPT_ID};

/// List workspace prompt definitions
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PromptListing {
    prompts: Vec<String>,
    answer_prompt: &'static str,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let listing = prompt_listing(config)?;

        if self.json {
            return print_json(&listing);
        }

        println!("Workspace prompts ({}):", listing.prompts.len());
        for id in &listing.prompts {
            println!("  {}", id);
        }
        println!();
        println!("Answer prompt: {}", listing.answer_prompt);

        Ok(())
    }
}

fn prompt_listing(config: &AppConfig) -> AppResult<PromptListing> {
    let prompts = list_prompts(&config.workspace)?;
    let answer_prompt = if prompts.iter().any(|id| id == ANSWER_PROMPT_ID) {
        "workspace override"
    } else {
        "built-in"
    };

    Ok(PromptListing {
        prompts,
        answer_prompt,
    })
}
