//! Metadata filtering for retrieval candidates.
//!
//! Optional per-tier predicate applied to candidates after the similarity
//! query and before reranking. Filtering narrows provenance (a known source
//! document, a page window) or quality (a score floor) without touching the
//! index itself.

use crate::types::ScoredPassage;
use serde::{Deserialize, Serialize};

/// Predicate over passage provenance and score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Keep only passages from this source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Keep only passages within this inclusive page range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<(u32, u32)>,

    /// Keep only passages at or above this relevance score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
}

impl MetadataFilter {
    /// Create an empty filter (keeps everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one source document.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Restrict to an inclusive page range.
    pub fn with_pages(mut self, first: u32, last: u32) -> Self {
        self.pages = Some((first, last));
        self
    }

    /// Require a minimum relevance score.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Whether any predicate is set.
    pub fn is_active(&self) -> bool {
        self.source.is_some() || self.pages.is_some() || self.min_score.is_some()
    }

    /// Apply the filter to scored candidates, preserving order.
    pub fn apply(&self, candidates: Vec<ScoredPassage>) -> Vec<ScoredPassage> {
        let mut filtered = candidates;

        if let Some(min_score) = self.min_score {
            filtered.retain(|(_, score)| *score >= min_score);
        }

        if let Some(source) = &self.source {
            filtered.retain(|(chunk, _)| chunk.source == *source);
        }

        if let Some((first, last)) = self.pages {
            filtered.retain(|(chunk, _)| chunk.page >= first && chunk.page <= last);
        }

        filtered
    }
}
