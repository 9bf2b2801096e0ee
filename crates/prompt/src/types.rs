//! Prompt types for the DocQA engine.

use serde::{Deserialize, Serialize};

/// A prompt definition: a system instruction plus a Handlebars user template.
///
/// Definitions ship as built-in defaults (see [`crate::templates`]) and may
/// be replaced one-by-one from YAML files in a prompt directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier (e.g., "precise.answer")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// System instruction sent verbatim (no template variables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// User message template with Handlebars syntax
    pub template: String,
}

/// A fully built prompt ready for the generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Source prompt ID, kept for logging
    pub source_prompt_id: String,
}
