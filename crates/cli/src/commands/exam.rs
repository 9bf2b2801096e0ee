//! Exam command handler.
//!
//! Reads a whole question sheet, answers every question, and writes the
//! answer sheet. One question's degraded outcome never aborts the rest; the
//! engine guarantees a well-formed result per request.

use crate::commands::build_engine;
use chrono::Local;
use clap::Args;
use docqa_core::{config::AppConfig, QaError, QaResult};
use docqa_engine::{AnswerResult, SurfacedPassage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// Answer a whole question sheet, producing an answer sheet
#[derive(Args, Debug)]
pub struct ExamCommand {
    /// Question sheet JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Answer sheet output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Corpus of pre-chunked passages (JSONL); overrides the global flag
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

/// Input question sheet shape.
#[derive(Debug, Serialize, Deserialize)]
struct QuestionSheet {
    #[serde(default)]
    exam_info: serde_json::Value,

    questions: Vec<SheetQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SheetQuestion {
    #[serde(default)]
    question_id: Option<String>,

    #[serde(default)]
    category: Option<String>,

    query: String,
}

/// Output answer sheet shape.
#[derive(Debug, Serialize, Deserialize)]
struct AnswerSheet {
    exam_info: serde_json::Value,
    answers: Vec<SheetAnswer>,
    processing_info: ProcessingInfo,
}

#[derive(Debug, Serialize, Deserialize)]
struct SheetAnswer {
    question_id: String,
    category: String,
    query: String,
    result: Vec<SurfacedPassage>,
    answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProcessingInfo {
    processed_at: String,
    total_questions: usize,
    time_used: f64,
}

impl ExamCommand {
    /// Execute the exam command.
    pub async fn execute(&self, config: &AppConfig) -> QaResult<()> {
        tracing::info!("Executing exam command on {:?}", self.input);

        let contents = std::fs::read_to_string(&self.input)?;
        let sheet: QuestionSheet = serde_json::from_str(&contents)?;

        if sheet.questions.is_empty() {
            return Err(QaError::Config(format!(
                "Question sheet {:?} has no questions",
                self.input
            )));
        }

        let engine = build_engine(config, self.corpus.as_ref())?;

        let total = sheet.questions.len();
        tracing::info!("Answering {} questions", total);
        let start = Instant::now();

        let batch: Vec<(Option<String>, String)> = sheet
            .questions
            .iter()
            .map(|q| (q.question_id.clone(), q.query.clone()))
            .collect();

        let results = engine.answer_batch(&batch).await;

        let answers = sheet
            .questions
            .iter()
            .zip(results.iter())
            .enumerate()
            .map(|(i, (question, result))| to_sheet_answer(i, question, result))
            .collect();

        let answer_sheet = AnswerSheet {
            exam_info: sheet.exam_info,
            answers,
            processing_info: ProcessingInfo {
                processed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                total_questions: total,
                time_used: start.elapsed().as_secs_f64(),
            },
        };

        let json = serde_json::to_string_pretty(&answer_sheet)?;
        std::fs::write(&self.output, json)?;

        tracing::info!(
            "Answer sheet with {} answers written to {:?}",
            total,
            self.output
        );

        Ok(())
    }
}

fn to_sheet_answer(index: usize, question: &SheetQuestion, result: &AnswerResult) -> SheetAnswer {
    SheetAnswer {
        question_id: question
            .question_id
            .clone()
            .unwrap_or_else(|| format!("Q{}", index + 1)),
        category: question
            .category
            .clone()
            .unwrap_or_else(|| "uncategorized".to_string()),
        query: question.query.clone(),
        result: result.passages.clone(),
        answer: result.answer.clone(),
    }
}
