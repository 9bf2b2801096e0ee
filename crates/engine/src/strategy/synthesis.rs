//! Single-Document-Synthesis pipeline.
//!
//! One wide retrieval round, then everything narrows to the single most
//! relevant document: candidates are grouped by source, the group with the
//! highest summed score wins, and only its passages reach the generation
//! collaborator, reordered to follow the document (page, then chunk
//! sequence). This tier trades recall across documents for coherence
//! within one.

use crate::strategy::{generate_or_error_answer, passage_block, PipelineContext, PipelineOutcome};
use crate::types::{PassageChunk, ScoredPassage};
use std::collections::HashMap;

pub(crate) async fn run(question: &str, ctx: &PipelineContext<'_>) -> PipelineOutcome {
    let settings = &ctx.config.synthesis;

    let results = match ctx.gateway.retrieve(question, settings).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!("Synthesis retrieval unavailable: {}", e);
            return PipelineOutcome::no_evidence();
        }
    };

    if results.is_empty() {
        return PipelineOutcome::no_evidence();
    }

    let passages = select_primary_document(results);

    tracing::info!(
        "Synthesis selected primary document '{}' with {} passages",
        passages
            .first()
            .map(|p| p.source.as_str())
            .unwrap_or("<none>"),
        passages.len()
    );

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("passages".to_string(), passage_block(&passages));

    let raw_answer = generate_or_error_answer(
        ctx,
        "synthesis.answer",
        &variables,
        ctx.config.base_temperature,
    )
    .await;

    PipelineOutcome {
        raw_answer,
        surfaced: passages,
        sub_questions: Vec::new(),
    }
}

/// Keep only the primary document's passages, in document order.
///
/// Primary document = highest summed relevance score across its retrieved
/// passages; a tie goes to the document seen first in the retrieval order.
/// The survivors are sorted by (page, seq) so synthesis can follow the
/// document's structure.
fn select_primary_document(results: Vec<ScoredPassage>) -> Vec<PassageChunk> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f32> = HashMap::new();

    for (chunk, score) in &results {
        let source = chunk.source.as_str();
        if !totals.contains_key(source) {
            order.push(source);
        }
        *totals.entry(source).or_insert(0.0) += score;
    }

    // Strict greater-than keeps the first-seen document on ties.
    let mut primary = order[0];
    for &source in &order[1..] {
        if totals[source] > totals[primary] {
            primary = source;
        }
    }

    let primary = primary.to_string();

    let mut passages: Vec<PassageChunk> = results
        .into_iter()
        .filter(|(chunk, _)| chunk.source == primary)
        .map(|(chunk, _)| chunk)
        .collect();

    passages.sort_by_key(|chunk| (chunk.page, chunk.seq));
    passages
}
