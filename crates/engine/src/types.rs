//! Engine type definitions.
//!
//! Everything here is a value type: created once per request, immutable after
//! construction, never stored between requests.

use serde::{Deserialize, Serialize};

/// Resolved complexity class of a question.
///
/// The tier is decided once by the classifier and never re-evaluated
/// mid-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Fact lookup: one passage holds the answer
    Precise,
    /// Broad question answered from a single document
    Synthesis,
    /// Complex question spanning several documents
    Decomposition,
}

impl Tier {
    /// Canonical lowercase name, used in answer-card metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precise => "precise",
            Self::Synthesis => "synthesis",
            Self::Decomposition => "decomposition",
        }
    }

    /// Name of the pipeline that handles this tier.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Precise => "precise_lookup",
            Self::Synthesis => "single_doc_synthesis",
            Self::Decomposition => "multi_doc_decomposition",
        }
    }
}

/// An incoming question, immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Caller-supplied identifier (e.g., "B001"), if any
    pub id: Option<String>,

    /// Question text
    pub text: String,

    /// Tier resolved by the classifier
    pub tier: Tier,
}

/// A bounded span of source text with document/page provenance.
///
/// Chunks are produced by the external chunking/indexing collaborator; the
/// engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageChunk {
    /// Text content of the chunk
    pub content: String,

    /// Source document name (e.g., "signalling.pdf")
    pub source: String,

    /// 1-based page number within the source document
    pub page: u32,

    /// Monotone chunk sequence index within the source document
    pub seq: u32,

    /// Relevance score from the retrieval round, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl PassageChunk {
    /// Identity key for value-level deduplication.
    pub fn identity(&self) -> (&str, u32, u32) {
        (&self.source, self.page, self.seq)
    }
}

/// One retrieval hit: a chunk and its similarity score.
pub type ScoredPassage = (PassageChunk, f32);

/// A (source document, page) attribution.
///
/// Deduplicated by value; insertion order is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: u32,
}

impl Citation {
    /// Citation for a passage chunk.
    pub fn of(chunk: &PassageChunk) -> Self {
        Self {
            source: chunk.source.clone(),
            page: chunk.page,
        }
    }

    /// Stable textual marker, used both as dedup key and for display.
    pub fn marker(&self) -> String {
        format!("【{}, P{}】", self.source, self.page)
    }
}

/// Caller-facing record of a passage that was surfaced to generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacedPassage {
    /// 1-based rank in generation-supply order
    pub position: u32,

    /// Text content
    pub content: String,

    /// Source document name
    pub source: String,

    /// 1-based page number
    pub page: u32,
}

/// Report for one sub-question of a Decomposition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestionReport {
    /// 0-based decomposition order
    pub index: u32,

    /// Sub-question text
    pub text: String,

    /// Partial answer grounded in this sub-question's passages
    pub answer: String,

    /// Citations derived from this sub-question's passages
    pub citations: Vec<Citation>,
}

/// Final result of one answered question.
///
/// Created once per request; a response value, not stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Final answer text with embedded citation markers
    pub answer: String,

    /// Deduplicated citations, first-seen order
    pub citations: Vec<Citation>,

    /// Passages surfaced to the caller, 1-based positions
    pub passages: Vec<SurfacedPassage>,

    /// Resolved tier
    pub tier: Tier,

    /// Name of the pipeline that produced the answer
    pub strategy: String,

    /// Wall-clock processing time in seconds
    pub elapsed_secs: f64,

    /// Sub-question reports (Decomposition tier only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_questions: Vec<SubQuestionReport>,
}

/// Caller-facing answer card, the hand-off payload for CLI and file layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerCard {
    /// Original query text
    pub query: String,

    /// Surfaced passages with positions
    pub result: Vec<SurfacedPassage>,

    /// Final answer text
    pub answer: String,

    /// Request metadata
    pub metadata: AnswerCardMetadata,
}

/// Metadata block of an answer card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerCardMetadata {
    /// Resolved tier name
    pub difficulty: String,

    /// Pipeline name
    pub strategy: String,

    /// Processing time in seconds
    pub time_used: f64,

    /// Deduplicated citation markers
    pub sources: Vec<String>,

    /// Sub-question texts (Decomposition tier only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_questions: Vec<String>,
}

impl AnswerCard {
    /// Build the caller-facing card from an answer result.
    pub fn from_result(query: impl Into<String>, result: &AnswerResult) -> Self {
        Self {
            query: query.into(),
            result: result.passages.clone(),
            answer: result.answer.clone(),
            metadata: AnswerCardMetadata {
                difficulty: result.tier.as_str().to_string(),
                strategy: result.strategy.clone(),
                time_used: result.elapsed_secs,
                sources: result.citations.iter().map(Citation::marker).collect(),
                sub_questions: result
                    .sub_questions
                    .iter()
                    .map(|sq| sq.text.clone())
                    .collect(),
            },
        }
    }
}
