//! Sample-query command handler.

use crate::commands::ask::QueryFile;
use clap::Args;
use docqa_core::QaResult;
use std::path::PathBuf;

/// Write a sample query JSON file
#[derive(Args, Debug)]
pub struct SampleQueryCommand {
    /// Output file path
    #[arg(short, long, default_value = "sample_query.json")]
    pub output: PathBuf,
}

impl SampleQueryCommand {
    /// Execute the sample-query command.
    pub fn execute(&self) -> QaResult<()> {
        let sample = QueryFile {
            query: "What is CBTC?".to_string(),
            question_id: Some("B001".to_string()),
        };

        let json = serde_json::to_string_pretty(&sample)?;
        std::fs::write(&self.output, json)?;

        println!("Sample query written to {:?}", self.output);
        Ok(())
    }
}
