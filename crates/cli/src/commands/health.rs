//! Health command handler.

use super::print_json;
use clap::Args;
use vta_core::{config::AppConfig, AppResult};
use vta_knowledge::VirtualTa;

/// Show pipeline health
#[derive(Args, Debug)]
pub struct HealthCommand {}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing health command");

        let ta = VirtualTa::from_config(config).await?;
        print_json(&ta.health().await)
    }
}
