//! Command handlers for the DocQA CLI.

mod ask;
mod exam;
mod sample;

pub use ask::AskCommand;
pub use exam::ExamCommand;
pub use sample::SampleQueryCommand;

use docqa_core::{config::AppConfig, QaError, QaResult};
use docqa_engine::{
    DifficultyClassifier, EngineConfig, MemoryIndex, OverlapReranker, QaEngine,
};
use docqa_llm::create_client;
use docqa_prompt::PromptLibrary;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wire up an engine over a JSONL corpus.
///
/// The corpus is loaded into all three tier collections; the per-tier chunk
/// granularity contract is honored upstream by whoever produced the file.
pub(crate) fn build_engine(config: &AppConfig, corpus: Option<&PathBuf>) -> QaResult<QaEngine> {
    let corpus_path: &Path = corpus
        .or(config.corpus.as_ref())
        .ok_or_else(|| {
            QaError::Config("No corpus given (use --corpus or DOCQA_CORPUS)".to_string())
        })?
        .as_path();

    let engine_config = EngineConfig::for_model(&config.model);

    let collections = [
        engine_config.precise.collection.as_str(),
        engine_config.synthesis.collection.as_str(),
        engine_config.decomposition.collection.as_str(),
    ];
    let index = MemoryIndex::load_jsonl(corpus_path, &collections)?;

    let prompts = match &config.prompt_dir {
        Some(dir) => PromptLibrary::with_overrides(dir)?,
        None => PromptLibrary::builtin(),
    };

    let client = create_client(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )
    .map_err(QaError::Config)?;

    Ok(QaEngine::new(
        engine_config,
        DifficultyClassifier::default(),
        Arc::new(index),
        Arc::new(OverlapReranker::new()),
        client,
        prompts,
    ))
}
