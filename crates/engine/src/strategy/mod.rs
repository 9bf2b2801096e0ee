//! Strategy engine: three tier-specific pipelines behind one dispatcher.
//!
//! The tier enum selects one of three pipeline functions of identical shape;
//! there is no trait hierarchy. Each pipeline runs its retrieval round(s),
//! prompts the generation collaborator, and reports what it surfaced. All
//! failure recovery happens here: a pipeline never returns an error, it
//! returns a degraded outcome.

pub mod decompose;
pub mod precise;
pub mod synthesis;

use crate::config::EngineConfig;
use crate::generation::Generator;
use crate::retrieval::RetrievalGateway;
use crate::types::{Citation, PassageChunk, SubQuestionReport, Tier};
use std::collections::HashMap;

/// Answer text used when retrieval produced no evidence.
pub const NO_EVIDENCE_ANSWER: &str =
    "No relevant information was found in the document corpus.";

/// Shared collaborators handed to every pipeline.
pub(crate) struct PipelineContext<'a> {
    pub gateway: &'a RetrievalGateway,
    pub generator: &'a Generator,
    pub config: &'a EngineConfig,
}

/// What a pipeline produced, before attribution assembly.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Raw answer text from generation (or a degraded-outcome text)
    pub raw_answer: String,

    /// Passages surfaced to generation, in supply order
    pub surfaced: Vec<PassageChunk>,

    /// Sub-question reports (Decomposition tier only)
    pub sub_questions: Vec<SubQuestionReport>,
}

impl PipelineOutcome {
    /// Outcome for "retrieval found nothing": explicit signal, no citations.
    pub(crate) fn no_evidence() -> Self {
        Self {
            raw_answer: NO_EVIDENCE_ANSWER.to_string(),
            surfaced: Vec::new(),
            sub_questions: Vec::new(),
        }
    }
}

/// Dispatch a question to its tier's pipeline.
pub(crate) async fn run(
    tier: Tier,
    question: &str,
    ctx: &PipelineContext<'_>,
) -> PipelineOutcome {
    match tier {
        Tier::Precise => precise::run(question, ctx).await,
        Tier::Synthesis => synthesis::run(question, ctx).await,
        Tier::Decomposition => decompose::run(question, ctx).await,
    }
}

/// Run a generation call, degrading a double failure into an explicit error
/// answer instead of propagating it.
pub(crate) async fn generate_or_error_answer(
    ctx: &PipelineContext<'_>,
    prompt_id: &str,
    variables: &HashMap<String, String>,
    temperature: f32,
) -> String {
    match ctx
        .generator
        .generate(prompt_id, variables, temperature)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!("Generation failed twice for '{}': {}", prompt_id, e);
            format!("The answer could not be generated: {}", e)
        }
    }
}

/// Render one passage with its citation marker for a prompt.
pub(crate) fn single_passage_block(chunk: &PassageChunk) -> String {
    format!("{}\n{}", Citation::of(chunk).marker(), chunk.content)
}

/// Render a numbered passage list for a prompt, preserving supply order.
pub(crate) fn passage_block(chunks: &[PassageChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "--- Passage {} {} ---\n{}",
                i + 1,
                Citation::of(chunk).marker(),
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
