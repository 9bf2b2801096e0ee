//! Retrieval gateway.
//!
//! Uniform interface to the vector search and rerank collaborators,
//! parameterized per tier. The collaborators sit behind traits so tests and
//! local runs can substitute deterministic implementations.

pub mod filter;
pub mod memory;
pub mod rerank;

use crate::config::TierSettings;
use crate::types::{PassageChunk, ScoredPassage};
use docqa_core::QaResult;
use std::cmp::Ordering;
use std::sync::Arc;

pub use filter::MetadataFilter;
pub use memory::MemoryIndex;
pub use rerank::OverlapReranker;

/// Similarity search over a tier's indexed collection.
///
/// Each tier queries its own collection, built externally with that tier's
/// chunk granularity. Implementations must return results ordered by
/// descending similarity and fail with `QaError::RetrievalUnavailable` when
/// the collection is empty or the backend cannot be reached.
#[async_trait::async_trait]
pub trait PassageIndex: Send + Sync {
    /// Search `collection` for the `top_k` passages most similar to `query`.
    async fn search(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> QaResult<Vec<ScoredPassage>>;
}

/// Second-pass relevance scoring of retrieval candidates.
///
/// Stands in for an external cross-encoder: more expensive, higher
/// precision than the embedding similarity that produced the candidates.
#[async_trait::async_trait]
pub trait RerankModel: Send + Sync {
    /// Rank `candidates` against `query`; returns at most `keep` indices
    /// into `candidates`, best first.
    async fn rerank(
        &self,
        query: &str,
        candidates: &[PassageChunk],
        keep: usize,
    ) -> QaResult<Vec<usize>>;
}

/// Gateway in front of the search and rerank collaborators.
///
/// Enforces the per-tier retrieval contract: at most `width` results,
/// descending score with stable ties, and rerank-to-one narrowing when the
/// tier asks for it.
pub struct RetrievalGateway {
    index: Arc<dyn PassageIndex>,
    reranker: Arc<dyn RerankModel>,
}

impl RetrievalGateway {
    /// Create a gateway over the given collaborators.
    pub fn new(index: Arc<dyn PassageIndex>, reranker: Arc<dyn RerankModel>) -> Self {
        Self { index, reranker }
    }

    /// Run one retrieval round for a tier.
    ///
    /// With `settings.rerank` set, the raw top-`width` candidates are passed
    /// through the rerank collaborator and only the single best survives:
    /// rerank narrows width to one, it never reorders without truncating.
    pub async fn retrieve(
        &self,
        query: &str,
        settings: &TierSettings,
    ) -> QaResult<Vec<ScoredPassage>> {
        let mut results = self
            .index
            .search(&settings.collection, query, settings.width)
            .await?;

        // The index contract says ordered and capped; enforce both anyway.
        // A stable sort keeps insertion order on score ties.
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        results.truncate(settings.width);

        if let Some(filter) = &settings.filter {
            if filter.is_active() {
                let before = results.len();
                results = filter.apply(results);
                tracing::debug!("Metadata filter kept {} of {} candidates", results.len(), before);
            }
        }

        tracing::debug!(
            "Retrieved {} candidates from '{}' (width {})",
            results.len(),
            settings.collection,
            settings.width
        );

        if settings.rerank && !results.is_empty() {
            let candidates: Vec<PassageChunk> =
                results.iter().map(|(chunk, _)| chunk.clone()).collect();
            let ranked = self.reranker.rerank(query, &candidates, 1).await?;

            results = ranked
                .first()
                .and_then(|&i| results.get(i).cloned())
                .into_iter()
                .collect();

            tracing::debug!("Rerank narrowed candidates to {}", results.len());
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierSettings;
    use docqa_core::QaError;

    struct FixedIndex {
        results: Vec<ScoredPassage>,
    }

    #[async_trait::async_trait]
    impl PassageIndex for FixedIndex {
        async fn search(
            &self,
            _collection: &str,
            _query: &str,
            _top_k: usize,
        ) -> QaResult<Vec<ScoredPassage>> {
            if self.results.is_empty() {
                return Err(QaError::RetrievalUnavailable("empty index".to_string()));
            }
            Ok(self.results.clone())
        }
    }

    struct LastWinsReranker;

    #[async_trait::async_trait]
    impl RerankModel for LastWinsReranker {
        async fn rerank(
            &self,
            _query: &str,
            candidates: &[PassageChunk],
            keep: usize,
        ) -> QaResult<Vec<usize>> {
            // Deliberately disagrees with embedding order.
            Ok((0..candidates.len()).rev().take(keep).collect())
        }
    }

    fn chunk(source: &str, seq: u32) -> PassageChunk {
        PassageChunk {
            content: format!("passage {}", seq),
            source: source.to_string(),
            page: 1,
            seq,
            score: None,
        }
    }

    fn settings(width: usize, rerank: bool) -> TierSettings {
        TierSettings {
            collection: "test".to_string(),
            width,
            rerank,
            filter: None,
            chunk_size: 512,
            chunk_overlap: 50,
        }
    }

    #[tokio::test]
    async fn test_width_cap_and_ordering() {
        let index = Arc::new(FixedIndex {
            results: vec![
                (chunk("a.pdf", 0), 0.2),
                (chunk("a.pdf", 1), 0.9),
                (chunk("a.pdf", 2), 0.5),
            ],
        });
        let gateway = RetrievalGateway::new(index, Arc::new(LastWinsReranker));

        let results = gateway.retrieve("q", &settings(2, false)).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1, 0.9);
        assert_eq!(results[1].1, 0.5);
    }

    #[tokio::test]
    async fn test_stable_tie_order() {
        let index = Arc::new(FixedIndex {
            results: vec![
                (chunk("a.pdf", 0), 0.5),
                (chunk("b.pdf", 0), 0.5),
                (chunk("c.pdf", 0), 0.5),
            ],
        });
        let gateway = RetrievalGateway::new(index, Arc::new(LastWinsReranker));

        let results = gateway.retrieve("q", &settings(3, false)).await.unwrap();
        let sources: Vec<&str> = results.iter().map(|(c, _)| c.source.as_str()).collect();
        assert_eq!(sources, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn test_rerank_narrows_to_one() {
        let index = Arc::new(FixedIndex {
            results: vec![
                (chunk("a.pdf", 0), 0.9),
                (chunk("a.pdf", 1), 0.8),
                (chunk("a.pdf", 2), 0.7),
            ],
        });
        let gateway = RetrievalGateway::new(index, Arc::new(LastWinsReranker));

        let results = gateway.retrieve("q", &settings(3, true)).await.unwrap();
        assert_eq!(results.len(), 1);
        // LastWinsReranker picks the lowest-scored candidate.
        assert_eq!(results[0].0.seq, 2);
    }

    #[tokio::test]
    async fn test_metadata_filter_narrows_candidates() {
        let index = Arc::new(FixedIndex {
            results: vec![
                (chunk("a.pdf", 0), 0.9),
                (chunk("b.pdf", 1), 0.8),
                (chunk("a.pdf", 2), 0.7),
            ],
        });
        let gateway = RetrievalGateway::new(index, Arc::new(LastWinsReranker));

        let mut settings = settings(3, false);
        settings.filter = Some(MetadataFilter::new().with_source("a.pdf"));

        let results = gateway.retrieve("q", &settings).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(c, _)| c.source == "a.pdf"));
    }

    #[tokio::test]
    async fn test_empty_index_is_unavailable() {
        let index = Arc::new(FixedIndex { results: vec![] });
        let gateway = RetrievalGateway::new(index, Arc::new(LastWinsReranker));

        let err = gateway.retrieve("q", &settings(5, false)).await.unwrap_err();
        assert!(matches!(err, QaError::RetrievalUnavailable(_)));
    }
}
