//! TDS Virtual TA CLI
//!
//! Main entry point for the `vta` command-line tool.
//! Answers course questions from the local corpus and a generation provider.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CorpusCommand, HealthCommand, InfoCommand, PromptsCommand};
use std::path::PathBuf;
use vta_core::{config::AppConfig, logging, AppResult};

/// TDS Virtual TA - course answers with supporting links
#[derive(Parser, Debug)]
#[command(name = "vta")]
#[command(about = "Answer Tools in Data Science questions with supporting links", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "VTA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "VTA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (gemini, ollama, mock)
    #[arg(short, long, global = true, env = "VTA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier, or "auto"
    #[arg(short, long, global = true, env = "VTA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question
    Ask(AskCommand),

    /// Show pipeline health
    Health(HealthCommand),

    /// Describe the service
    Info(InfoCommand),

    /// List the loaded corpus
    Corpus(CorpusCommand),

    /// List workspace prompt definitions
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Logs go to stderr; stdout carries the JSON output
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("TDS Virtual TA starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Health(_) => "health",
        Commands::Info(_) => "info",
        Commands::Corpus(_) => "corpus",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Health(cmd) => cmd.execute(&config).await,
        Commands::Info(cmd) => cmd.execute(),
        Commands::Corpus(cmd) => cmd.execute(&config),
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
