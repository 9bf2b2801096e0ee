//! Precise-Lookup pipeline.
//!
//! Needle-in-a-haystack fact lookup: one narrow retrieval round over the
//! small-chunk collection, reranked down to the single best passage, then a
//! concise answer prompted from that passage alone.

use crate::strategy::{generate_or_error_answer, single_passage_block, PipelineContext, PipelineOutcome};
use std::collections::HashMap;

pub(crate) async fn run(question: &str, ctx: &PipelineContext<'_>) -> PipelineOutcome {
    let settings = &ctx.config.precise;

    let results = match ctx.gateway.retrieve(question, settings).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!("Precise retrieval unavailable: {}", e);
            return PipelineOutcome::no_evidence();
        }
    };

    // Rerank already narrowed the round to one candidate.
    let Some((best, score)) = results.into_iter().next() else {
        return PipelineOutcome::no_evidence();
    };

    tracing::info!(
        "Precise lookup surfaced {} P{} (score {:.3})",
        best.source,
        best.page,
        score
    );

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("passage".to_string(), single_passage_block(&best));

    let raw_answer = generate_or_error_answer(
        ctx,
        "precise.answer",
        &variables,
        ctx.config.base_temperature,
    )
    .await;

    PipelineOutcome {
        raw_answer,
        surfaced: vec![best],
        sub_questions: Vec::new(),
    }
}
