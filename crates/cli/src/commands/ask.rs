//! Ask command handler.
//!
//! Answers one question and emits the answer card (query, surfaced
//! passages, answer text, metadata) as JSON.

use crate::commands::build_engine;
use clap::Args;
use docqa_core::{config::AppConfig, QaError, QaResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Answer a single question, producing an answer card
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Question identifier used for difficulty classification (e.g., B001)
    #[arg(long)]
    pub id: Option<String>,

    /// Read a {"query", "question_id"} JSON file instead of a question
    #[arg(short, long, conflicts_with = "question")]
    pub input: Option<PathBuf>,

    /// Corpus of pre-chunked passages (JSONL); overrides the global flag
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Write the answer card here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Input query file shape.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QueryFile {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> QaResult<()> {
        tracing::info!("Executing ask command");

        let (query, id) = self.resolve_query()?;

        let engine = build_engine(config, self.corpus.as_ref())?;
        let card = engine.answer_card(id.as_deref(), &query).await;

        let json = serde_json::to_string_pretty(&card)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, json)?;
                tracing::info!("Answer card written to {:?}", path);
            }
            None => println!("{}", json),
        }

        Ok(())
    }

    /// Question text and identifier, from the flag or the input file.
    fn resolve_query(&self) -> QaResult<(String, Option<String>)> {
        if let Some(path) = &self.input {
            let contents = std::fs::read_to_string(path)?;
            let query_file: QueryFile = serde_json::from_str(&contents)?;

            if query_file.query.trim().is_empty() {
                return Err(QaError::Config(format!("{:?} has an empty query", path)));
            }

            return Ok((query_file.query, query_file.question_id));
        }

        let question = self
            .question
            .clone()
            .ok_or_else(|| QaError::Config("No question provided".to_string()))?;

        Ok((question, self.id.clone()))
    }
}
