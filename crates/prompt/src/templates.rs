//! Built-in prompt definitions.
//!
//! One definition per generation call the engine makes. The pipelines
//! pre-render passage blocks and sub-answer summaries; templates only place
//! them. Every answering prompt demands the 【file, Ppage】 citation marker so
//! attribution can be checked downstream.

use crate::types::PromptDefinition;

/// IDs of all built-in prompts, in the order the engine uses them.
pub const BUILTIN_IDS: [&str; 5] = [
    "precise.answer",
    "synthesis.answer",
    "decompose.split",
    "decompose.sub_answer",
    "decompose.final",
];

/// Return every built-in prompt definition.
pub fn builtin_definitions() -> Vec<PromptDefinition> {
    vec![
        precise_answer(),
        synthesis_answer(),
        decompose_split(),
        decompose_sub_answer(),
        decompose_final(),
    ]
}

/// Fact-lookup answer from a single reranked passage.
fn precise_answer() -> PromptDefinition {
    PromptDefinition {
        id: "precise.answer".to_string(),
        title: "Precise lookup answer".to_string(),
        system: Some(
            "You are a professional question-answering assistant. Answer the \
             user's question from the provided document passage.\n\n\
             Requirements:\n\
             1. Answer strictly from the passage; never add information it does not contain\n\
             2. Keep the answer concise and accurate\n\
             3. End the answer with its source, in the format 【file name, Ppage】\n\
             4. If the passage does not contain the needed information, say so explicitly"
                .to_string(),
        ),
        template: "Reference passage:\n{{passage}}\n\nQuestion: {{question}}\n\n\
                   Answer the question from the passage above and cite the source at the end."
            .to_string(),
    }
}

/// Synthesis across passages of one document.
fn synthesis_answer() -> PromptDefinition {
    PromptDefinition {
        id: "synthesis.answer".to_string(),
        title: "Single-document synthesis answer".to_string(),
        system: Some(
            "You are a professional question-answering assistant. Combine \
             information from different parts of the same document into one \
             complete, well-structured answer.\n\n\
             Requirements:\n\
             1. The passages come from different parts of a single document; synthesize them\n\
             2. Make the answer comprehensive and logically ordered\n\
             3. Mark every source used, in the format 【file name, Ppage】\n\
             4. Include complementary and related details from all passages\n\
             5. Keep the answer coherent"
                .to_string(),
        ),
        template: "Reference passages (from different parts of the same document):\n\
                   {{passages}}\n\nQuestion: {{question}}\n\n\
                   Synthesize all passages above into a complete answer and mark the sources."
            .to_string(),
    }
}

/// Decomposition of a complex question into sub-questions.
fn decompose_split() -> PromptDefinition {
    PromptDefinition {
        id: "decompose.split".to_string(),
        title: "Question decomposition".to_string(),
        system: Some(
            "You are a question-analysis expert. Split a complex question into \
             2-4 simpler sub-questions.\n\n\
             Requirements:\n\
             1. Each sub-question must be independent and unambiguous\n\
             2. The combined sub-question answers must answer the original question\n\
             3. For comparison questions, create one sub-question per compared item\n\
             4. Output only the sub-question list, one per line, numbered"
                .to_string(),
        ),
        template: "Split the following question into sub-questions:\n{{question}}".to_string(),
    }
}

/// Brief grounded answer for one sub-question.
fn decompose_sub_answer() -> PromptDefinition {
    PromptDefinition {
        id: "decompose.sub_answer".to_string(),
        title: "Sub-question answer".to_string(),
        system: Some(
            "You are a professional question-answering assistant. Answer briefly.".to_string(),
        ),
        template: "Passages:\n{{passages}}\n\nQuestion: {{question}}\n\nAnswer briefly:"
            .to_string(),
    }
}

/// Final synthesis across sub-question answers and their documents.
fn decompose_final() -> PromptDefinition {
    PromptDefinition {
        id: "decompose.final".to_string(),
        title: "Multi-document synthesis".to_string(),
        system: Some(
            "You are a technical document analyst. Synthesize an answer from \
             several documents.\n\n\
             Requirements:\n\
             1. Combine the sub-question findings with the supporting passages\n\
             2. Attribute differing or corroborating information to its document\n\
             3. Keep the answer clear, organized in short points\n\
             4. Always mark sources in the format 【file name, Ppage】"
                .to_string(),
        ),
        template: "Question: {{question}}\n\nSub-question findings:\n{{sub_answers}}\n\n\
                   Supporting passages:\n{{passages}}\n\n\
                   Give a synthesized answer with source markers."
            .to_string(),
    }
}
