//! Corpus command handler.
//!
//! Lists the course sections and forum posts the pipeline will search.

use super::print_json;
use clap::Args;
use vta_core::{config::AppConfig, AppResult};
use vta_knowledge::ContentStore;

/// List the loaded corpus
#[derive(Args, Debug)]
pub struct CorpusCommand {
    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing corpus command");

        let store = ContentStore::load(config)?;

        if self.json {
            return print_json(&store.summary());
        }

        println!("Course sections ({}):", store.documents().len());
        for doc in store.documents() {
            println!("  {:<12} {} [{}]", doc.id, doc.title, doc.topics.join(", "));
        }

        println!();
        println!("Forum posts ({}):", store.posts().len());
        for post in store.posts() {
            println!(
                "  {} {} ({} replies)\n    {}",
                post.created_at, post.title, post.replies, post.url
            );
        }

        Ok(())
    }
}
