//! Engine configuration.
//!
//! One immutable struct passed into the engine at construction time. Nothing
//! in the engine reads ambient global state; tests swap whole configs.

use crate::retrieval::MetadataFilter;
use crate::types::Tier;
use serde::{Deserialize, Serialize};

/// Retrieval parameters for one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSettings {
    /// Name of the indexed collection queried for this tier
    pub collection: String,

    /// Maximum candidates returned by one retrieval round
    pub width: usize,

    /// Whether candidates are narrowed to the single best via reranking
    pub rerank: bool,

    /// Optional metadata predicate applied to candidates before reranking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<MetadataFilter>,

    /// Chunk size the collection was built with (index-build contract)
    pub chunk_size: usize,

    /// Chunk overlap the collection was built with (index-build contract)
    pub chunk_overlap: usize,
}

/// Immutable engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tier used when no classifier rule matches
    pub default_tier: Tier,

    /// Generation model identifier
    pub model: String,

    /// Sampling temperature for lookup, synthesis, and sub-question answers
    pub base_temperature: f32,

    /// Sampling temperature for the final multi-document synthesis
    pub final_temperature: f32,

    /// Token budget per generated answer
    pub max_answer_tokens: u32,

    /// Upper bound on sub-questions kept after decomposition
    pub max_sub_questions: usize,

    /// Precise-Lookup retrieval parameters
    pub precise: TierSettings,

    /// Single-Document-Synthesis retrieval parameters
    pub synthesis: TierSettings,

    /// Multi-Document-Decomposition retrieval parameters
    pub decomposition: TierSettings,
}

impl EngineConfig {
    /// Retrieval settings for a tier.
    pub fn tier_settings(&self, tier: Tier) -> &TierSettings {
        match tier {
            Tier::Precise => &self.precise,
            Tier::Synthesis => &self.synthesis,
            Tier::Decomposition => &self.decomposition,
        }
    }

    /// Default configuration for a given generation model.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_tier: Tier::Synthesis,
            model: "llama3.2".to_string(),
            base_temperature: 0.1,
            final_temperature: 0.2,
            max_answer_tokens: 1000,
            max_sub_questions: 4,
            precise: TierSettings {
                collection: "precise".to_string(),
                width: 5,
                rerank: true,
                filter: None,
                chunk_size: 512,
                chunk_overlap: 50,
            },
            synthesis: TierSettings {
                collection: "synthesis".to_string(),
                width: 10,
                rerank: false,
                filter: None,
                chunk_size: 1024,
                chunk_overlap: 100,
            },
            decomposition: TierSettings {
                collection: "decomposition".to_string(),
                width: 15,
                rerank: false,
                filter: None,
                chunk_size: 1024,
                chunk_overlap: 150,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_widths() {
        let config = EngineConfig::default();
        assert_eq!(config.precise.width, 5);
        assert_eq!(config.synthesis.width, 10);
        assert_eq!(config.decomposition.width, 15);
        assert!(config.precise.rerank);
        assert!(!config.synthesis.rerank);
        assert!(!config.decomposition.rerank);
    }

    #[test]
    fn test_tier_settings_lookup() {
        let config = EngineConfig::default();
        assert_eq!(config.tier_settings(Tier::Precise).collection, "precise");
        assert_eq!(
            config.tier_settings(Tier::Decomposition).collection,
            "decomposition"
        );
    }

    #[test]
    fn test_for_model() {
        let config = EngineConfig::for_model("qwen2.5");
        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.default_tier, Tier::Synthesis);
    }
}
