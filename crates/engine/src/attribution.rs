//! Attribution assembly.
//!
//! Turns a pipeline outcome into the final [`AnswerResult`]: positions the
//! surfaced passages, deduplicates citations, and enforces the engine's hard
//! guarantee that an answer grounded in passages always carries at least one
//! citation marker.

use crate::strategy::PipelineOutcome;
use crate::types::{AnswerResult, Citation, PassageChunk, SurfacedPassage, Tier};
use std::collections::HashSet;
use std::time::Duration;

/// Build the final answer result from a pipeline outcome.
pub fn assemble(tier: Tier, outcome: PipelineOutcome, elapsed: Duration) -> AnswerResult {
    let citations = dedup_citations(&outcome.surfaced);
    let answer = ensure_citations(outcome.raw_answer, &citations);

    let passages = outcome
        .surfaced
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| SurfacedPassage {
            position: (i + 1) as u32,
            content: chunk.content,
            source: chunk.source,
            page: chunk.page,
        })
        .collect();

    AnswerResult {
        answer,
        citations,
        passages,
        tier,
        strategy: tier.strategy_name().to_string(),
        elapsed_secs: elapsed.as_secs_f64(),
        sub_questions: outcome.sub_questions,
    }
}

/// Citations derived from passages, value-deduplicated, first-seen order.
pub fn dedup_citations(passages: &[PassageChunk]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for chunk in passages {
        let citation = Citation::of(chunk);
        if seen.insert(citation.clone()) {
            citations.push(citation);
        }
    }

    citations
}

/// Enforce the citation guarantee.
///
/// If the generation collaborator omitted every computed marker, the marker
/// list is appended in the fixed textual format rather than failing the
/// request. With no citations (no evidence), the text passes through as is.
fn ensure_citations(answer: String, citations: &[Citation]) -> String {
    if citations.is_empty() {
        return answer;
    }

    let has_marker = citations.iter().any(|c| answer.contains(&c.marker()));
    if has_marker {
        return answer;
    }

    tracing::debug!("Answer lacked citation markers; appending {}", citations.len());

    let markers: String = citations.iter().map(Citation::marker).collect();
    format!("{}\n\nSources: {}", answer.trim_end(), markers)
}
