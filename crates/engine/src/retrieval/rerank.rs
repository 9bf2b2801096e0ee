//! Deterministic lexical reranker.
//!
//! Stand-in for the external cross-encoder: scores each candidate by token
//! overlap with the query. Deployments with a real cross-encoder implement
//! [`RerankModel`] against it instead.

use crate::retrieval::RerankModel;
use crate::types::PassageChunk;
use docqa_core::QaResult;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Token-overlap reranker.
#[derive(Debug, Default)]
pub struct OverlapReranker;

impl OverlapReranker {
    pub fn new() -> Self {
        Self
    }

    fn score(query_tokens: &HashSet<String>, candidate: &PassageChunk) -> f32 {
        let candidate_tokens = tokenize(&candidate.content);
        if candidate_tokens.is_empty() {
            return 0.0;
        }

        let shared = candidate_tokens
            .iter()
            .filter(|t| query_tokens.contains(*t))
            .count();

        // Normalize by candidate length so long passages do not win on bulk.
        shared as f32 / (candidate_tokens.len() as f32).sqrt()
    }
}

#[async_trait::async_trait]
impl RerankModel for OverlapReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[PassageChunk],
        keep: usize,
    ) -> QaResult<Vec<usize>> {
        let query_tokens = tokenize(query);

        let mut ranked: Vec<(usize, f32)> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (i, Self::score(&query_tokens, c)))
            .collect();

        // Stable sort: candidates tied on overlap keep their retrieval order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(keep);

        Ok(ranked.into_iter().map(|(i, _)| i).collect())
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> PassageChunk {
        PassageChunk {
            content: content.to_string(),
            source: "doc.pdf".to_string(),
            page: 1,
            seq: 0,
            score: None,
        }
    }

    #[tokio::test]
    async fn test_best_lexical_match_wins() {
        let reranker = OverlapReranker::new();
        let candidates = vec![
            chunk("signalling maintenance schedules and inspection intervals"),
            chunk("CBTC is a communication based train control system"),
            chunk("station platform design guidelines"),
        ];

        let ranked = reranker
            .rerank("what is communication based train control", &candidates, 1)
            .await
            .unwrap();

        assert_eq!(ranked, vec![1]);
    }

    #[tokio::test]
    async fn test_keep_bounds_output() {
        let reranker = OverlapReranker::new();
        let candidates = vec![chunk("train"), chunk("train control"), chunk("train stop")];

        let ranked = reranker.rerank("train", &candidates, 2).await.unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let reranker = OverlapReranker::new();
        let ranked = reranker.rerank("query", &[], 1).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_deterministic() {
        let reranker = OverlapReranker::new();
        let candidates = vec![chunk("alpha beta"), chunk("beta gamma"), chunk("gamma delta")];

        let a = reranker.rerank("beta", &candidates, 3).await.unwrap();
        let b = reranker.rerank("beta", &candidates, 3).await.unwrap();
        assert_eq!(a, b);
    }
}
