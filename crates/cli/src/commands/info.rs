//! Info command handler.

use super::print_json;
use clap::Args;
use vta_core::AppResult;
use vta_knowledge::rag::ServiceInfo;

/// Describe the service
#[derive(Args, Debug)]
pub struct InfoCommand {}

impl InfoCommand {
    pub fn execute(&self) -> AppResult<()> {
        print_json(&ServiceInfo::current())
    }
}
