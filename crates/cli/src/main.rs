//! DocQA CLI
//!
//! Main entry point for the docqa command-line tool. Answers natural
//! language questions over a corpus of paginated documents with
//! difficulty-tiered retrieval and cited answers.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ExamCommand, SampleQueryCommand};
use docqa_core::{config::AppConfig, logging, QaResult};
use std::path::PathBuf;

/// DocQA CLI - difficulty-tiered question answering over documents
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Difficulty-tiered question answering over documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (ollama, openai, claude)
    #[arg(short, long, global = true, env = "DOCQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "DOCQA_MODEL")]
    model: Option<String>,

    /// Provider endpoint override
    #[arg(long, global = true, env = "DOCQA_ENDPOINT")]
    endpoint: Option<String>,

    /// Corpus of pre-chunked passages (JSONL)
    #[arg(long, global = true, env = "DOCQA_CORPUS")]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question, producing an answer card
    Ask(AskCommand),

    /// Answer a whole question sheet, producing an answer sheet
    Exam(ExamCommand),

    /// Write a sample query JSON file
    SampleQuery(SampleQueryCommand),
}

#[tokio::main]
async fn main() -> QaResult<()> {
    let cli = Cli::parse();

    // Load base configuration from environment, then apply CLI overrides
    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.endpoint,
        cli.corpus,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("DocQA CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Exam(_) => "exam",
        Commands::SampleQuery(_) => "sample-query",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Exam(cmd) => cmd.execute(&config).await,
        Commands::SampleQuery(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
