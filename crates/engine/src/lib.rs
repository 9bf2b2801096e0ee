//! Difficulty-tiered retrieval-and-synthesis engine.
//!
//! Turns a natural-language question over a corpus of paginated documents
//! into a grounded answer with verifiable source citations. The engine
//! classifies each question into a complexity tier, dispatches it to one of
//! three retrieval/synthesis pipelines, and assembles the result with
//! position-tracked attributions.
//!
//! Collaborators (vector search, reranking, generation) sit behind traits;
//! the engine holds no mutable state, so independent requests can be
//! processed concurrently.

pub mod attribution;
pub mod classify;
pub mod config;
pub mod generation;
pub mod retrieval;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use classify::{ClassifierRule, DifficultyClassifier};
pub use config::{EngineConfig, TierSettings};
pub use retrieval::{
    MemoryIndex, MetadataFilter, OverlapReranker, PassageIndex, RerankModel, RetrievalGateway,
};
pub use types::{
    AnswerCard, AnswerResult, Citation, PassageChunk, Question, SubQuestionReport,
    SurfacedPassage, Tier,
};

use docqa_llm::LlmClient;
use docqa_prompt::PromptLibrary;
use generation::Generator;
use std::sync::Arc;
use std::time::Instant;
use strategy::PipelineContext;

/// The question-answering engine.
///
/// Immutable after construction; every request owns its own
/// [`Question`]/[`AnswerResult`] lifecycle and nothing is shared between
/// requests except read-only collaborators.
pub struct QaEngine {
    classifier: DifficultyClassifier,
    gateway: RetrievalGateway,
    generator: Generator,
    config: EngineConfig,
}

impl QaEngine {
    /// Assemble an engine from its collaborators.
    pub fn new(
        config: EngineConfig,
        classifier: DifficultyClassifier,
        index: Arc<dyn PassageIndex>,
        reranker: Arc<dyn RerankModel>,
        client: Arc<dyn LlmClient>,
        prompts: PromptLibrary,
    ) -> Self {
        let generator = Generator::new(client, prompts, &config.model, config.max_answer_tokens);

        Self {
            classifier,
            gateway: RetrievalGateway::new(index, reranker),
            generator,
            config,
        }
    }

    /// Resolve a question's tier. The tier is fixed from here on; it is
    /// never re-evaluated mid-pipeline.
    pub fn resolve(&self, id: Option<&str>, text: &str) -> Question {
        let tier = self.classifier.classify(id, text);
        Question {
            id: id.map(str::to_string),
            text: text.to_string(),
            tier,
        }
    }

    /// Answer a question.
    ///
    /// Always returns a well-formed [`AnswerResult`]: retrieval and
    /// generation failures degrade the answer, they never fail the request.
    pub async fn answer(&self, id: Option<&str>, text: &str) -> AnswerResult {
        let question = self.resolve(id, text);
        self.answer_resolved(&question).await
    }

    /// Answer a question whose tier is already resolved.
    pub async fn answer_resolved(&self, question: &Question) -> AnswerResult {
        let start = Instant::now();

        tracing::info!(
            "Answering [{}] via {}: {}",
            question.id.as_deref().unwrap_or("-"),
            question.tier.strategy_name(),
            question.text
        );

        let ctx = PipelineContext {
            gateway: &self.gateway,
            generator: &self.generator,
            config: &self.config,
        };

        let outcome = strategy::run(question.tier, &question.text, &ctx).await;
        let result = attribution::assemble(question.tier, outcome, start.elapsed());

        tracing::info!(
            "Answered [{}] in {:.2}s with {} citations",
            question.id.as_deref().unwrap_or("-"),
            result.elapsed_secs,
            result.citations.len()
        );

        result
    }

    /// Answer a question and package the caller-facing card.
    pub async fn answer_card(&self, id: Option<&str>, text: &str) -> AnswerCard {
        let result = self.answer(id, text).await;
        AnswerCard::from_result(text, &result)
    }

    /// Answer a batch of `(identifier, text)` questions concurrently.
    ///
    /// Requests are isolated: a degraded outcome in one never aborts its
    /// siblings. Results come back in input order.
    pub async fn answer_batch(&self, questions: &[(Option<String>, String)]) -> Vec<AnswerResult> {
        futures::future::join_all(
            questions
                .iter()
                .map(|(id, text)| self.answer(id.as_deref(), text)),
        )
        .await
    }

    /// Engine configuration, for callers that need tier parameters.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
