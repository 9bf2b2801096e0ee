//! End-to-end pipeline scenarios with deterministic collaborators.
//!
//! The in-memory index plays the vector-search collaborator over a fixture
//! corpus; a scripted client plays the generation collaborator. Everything
//! is deterministic, so results can be compared structurally.

use docqa_core::{QaError, QaResult};
use docqa_engine::{
    AnswerCard, DifficultyClassifier, EngineConfig, MemoryIndex, OverlapReranker, PassageChunk,
    QaEngine, Tier,
};
use docqa_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docqa_prompt::PromptLibrary;
use std::collections::HashSet;
use std::sync::Arc;

/// Deterministic stand-in for the generation collaborator.
///
/// Decomposition prompts get the scripted sub-question list; every other
/// prompt gets the scripted answer. Prompts containing `fail_on` fail.
struct ScriptedLlm {
    decomposition: String,
    answer: String,
    fail_on: Option<String>,
}

impl ScriptedLlm {
    fn answering(answer: &str) -> Self {
        Self {
            decomposition: String::new(),
            answer: answer.to_string(),
            fail_on: None,
        }
    }

    fn with_decomposition(mut self, decomposition: &str) -> Self {
        self.decomposition = decomposition.to_string();
        self
    }

    fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> QaResult<LlmResponse> {
        if let Some(needle) = &self.fail_on {
            if request.prompt.contains(needle) {
                return Err(QaError::Generation("scripted failure".to_string()));
            }
        }

        let content = if request.prompt.starts_with("Split the following question") {
            self.decomposition.clone()
        } else {
            self.answer.clone()
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

fn chunk(content: &str, source: &str, page: u32, seq: u32) -> PassageChunk {
    PassageChunk {
        content: content.to_string(),
        source: source.to_string(),
        page,
        seq,
        score: None,
    }
}

fn engine(index: MemoryIndex, llm: ScriptedLlm) -> QaEngine {
    QaEngine::new(
        EngineConfig::default(),
        DifficultyClassifier::default(),
        Arc::new(index),
        Arc::new(OverlapReranker::new()),
        Arc::new(llm),
        PromptLibrary::builtin(),
    )
}

/// Small-chunk collection for the precise tier: one passage mentions CBTC,
/// the rest are distractors with disjoint vocabulary.
fn precise_corpus() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.insert(
        "precise",
        chunk(
            "CBTC stands for communication based train control, a railway signalling system.",
            "cbtc_overview.pdf",
            3,
            0,
        ),
    );
    index.insert(
        "precise",
        chunk("Track maintenance requires quarterly inspection.", "maint.pdf", 12, 0),
    );
    index.insert(
        "precise",
        chunk("Station platforms must provide level boarding.", "stations.pdf", 5, 0),
    );
    index.insert(
        "precise",
        chunk("Rolling stock axle loads vary by vehicle class.", "stock.pdf", 8, 0),
    );
    index.insert(
        "precise",
        chunk("Tunnel ventilation fans run on dedicated feeders.", "tunnel.pdf", 2, 0),
    );
    index.insert(
        "precise",
        chunk("Depot access roads close during overnight work.", "depot.pdf", 1, 0),
    );
    index
}

#[tokio::test]
async fn precise_scenario_b001_surfaces_exactly_one_passage() {
    let engine = engine(
        precise_corpus(),
        ScriptedLlm::answering(
            "CBTC is communication based train control. 【cbtc_overview.pdf, P3】",
        ),
    );

    let result = engine.answer(Some("B001"), "What is CBTC?").await;

    assert_eq!(result.tier, Tier::Precise);
    assert_eq!(result.strategy, "precise_lookup");
    assert_eq!(result.passages.len(), 1);
    assert_eq!(result.passages[0].position, 1);
    assert_eq!(result.passages[0].source, "cbtc_overview.pdf");

    // Exactly one citation marker in the final answer.
    assert_eq!(result.answer.matches('【').count(), 1);
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].marker(), "【cbtc_overview.pdf, P3】");
}

#[tokio::test]
async fn precise_pipeline_never_surfaces_more_than_one() {
    // Every passage matches the query; rerank must still narrow to one.
    let mut index = MemoryIndex::new();
    for seq in 0..8 {
        index.insert(
            "precise",
            chunk("braking distance of the train fleet", "brakes.pdf", seq + 1, seq),
        );
    }

    let engine = engine(index, ScriptedLlm::answering("Answer without markers"));
    let result = engine.answer(Some("B002"), "train braking distance").await;

    assert_eq!(result.passages.len(), 1);
    // The collaborator omitted markers, so the assembler appended them.
    assert!(result.answer.contains("【brakes.pdf, P"));
}

/// Medium-chunk collection where one document dominates on aggregate score
/// but candidates span three documents.
fn synthesis_corpus() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.insert(
        "synthesis",
        chunk(
            "The signalling upgrade programme covers the metro network resignalling scope.",
            "upgrade_plan.pdf",
            9,
            4,
        ),
    );
    index.insert(
        "synthesis",
        chunk(
            "Phase one of the signalling upgrade programme equips the metro core section.",
            "upgrade_plan.pdf",
            2,
            0,
        ),
    );
    index.insert(
        "synthesis",
        chunk(
            "The upgrade programme budget allocates funds across the metro network lines.",
            "upgrade_plan.pdf",
            5,
            2,
        ),
    );
    index.insert(
        "synthesis",
        chunk("Catering contracts renew each calendar year.", "catering.pdf", 4, 0),
    );
    index.insert(
        "synthesis",
        chunk("Uniform policy applies to frontline staff.", "hr_policy.pdf", 7, 0),
    );
    index
}

#[tokio::test]
async fn synthesis_scenario_i010_selects_primary_document_in_page_order() {
    let engine = engine(
        synthesis_corpus(),
        ScriptedLlm::answering("A synthesized overview of the programme."),
    );

    let result = engine
        .answer(
            Some("I010"),
            "Describe the signalling upgrade programme of the metro network",
        )
        .await;

    assert_eq!(result.tier, Tier::Synthesis);
    assert_eq!(result.strategy, "single_doc_synthesis");

    // All surfaced passages come from the primary document.
    assert!(!result.passages.is_empty());
    assert!(result
        .passages
        .iter()
        .all(|p| p.source == "upgrade_plan.pdf"));

    // Ordered by page ascending, positions 1-based.
    let pages: Vec<u32> = result.passages.iter().map(|p| p.page).collect();
    let mut sorted = pages.clone();
    sorted.sort_unstable();
    assert_eq!(pages, sorted);
    assert_eq!(result.passages[0].position, 1);

    // Markers were appended because the scripted answer had none.
    assert!(result.answer.contains("【upgrade_plan.pdf, P"));
}

/// Large-chunk collection with one passage per document for decomposition.
fn decomposition_corpus() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.insert(
        "decomposition",
        chunk(
            "The alpha system uses a fixed block braking model with trackside signals.",
            "alpha.pdf",
            14,
            0,
        ),
    );
    index.insert(
        "decomposition",
        chunk(
            "The beta system applies a moving block braking model over radio links.",
            "beta.pdf",
            6,
            0,
        ),
    );
    index.insert(
        "decomposition",
        chunk(
            "The gamma system combines braking models depending on territory class.",
            "gamma.pdf",
            21,
            0,
        ),
    );
    index
}

#[tokio::test]
async fn decomposition_scenario_a005_unions_citations_across_sub_questions() {
    let final_answer = "The alpha system uses fixed block 【alpha.pdf, P14】, \
                        the beta system moving block 【beta.pdf, P6】, while the \
                        gamma system mixes both 【gamma.pdf, P21】.";
    let llm = ScriptedLlm::answering(final_answer).with_decomposition(
        "1. What braking model does the alpha system use?\n\
         2. What braking model does the beta system use?\n\
         3. What braking model does the gamma system use?",
    );

    let engine = engine(decomposition_corpus(), llm);
    let result = engine
        .answer(Some("A005"), "Compare the braking models of the three systems")
        .await;

    assert_eq!(result.tier, Tier::Decomposition);
    assert_eq!(result.strategy, "multi_doc_decomposition");

    // Three sub-questions in decomposition order.
    assert_eq!(result.sub_questions.len(), 3);
    let indices: Vec<u32> = result.sub_questions.iter().map(|sq| sq.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    // Each sub-question's dominant source is its own document.
    let dominant: Vec<&str> = result
        .sub_questions
        .iter()
        .map(|sq| sq.citations[0].source.as_str())
        .collect();
    assert_eq!(dominant, vec!["alpha.pdf", "beta.pdf", "gamma.pdf"]);

    // Final citations are the deduplicated union of sub-question citations:
    // no loss, no duplication.
    let final_set: HashSet<_> = result.citations.iter().cloned().collect();
    let union: HashSet<_> = result
        .sub_questions
        .iter()
        .flat_map(|sq| sq.citations.iter().cloned())
        .collect();
    assert_eq!(final_set, union);
    assert_eq!(result.citations.len(), final_set.len());
    assert_eq!(final_set.len(), 3);

    // The final answer attributes each system to its document.
    assert!(result.answer.contains("【alpha.pdf, P14】"));
    assert!(result.answer.contains("【beta.pdf, P6】"));
    assert!(result.answer.contains("【gamma.pdf, P21】"));
}

#[tokio::test]
async fn decomposition_degrades_to_single_sub_question() {
    // Malformed decomposition output: no usable lines.
    let llm = ScriptedLlm::answering("An answer.").with_decomposition("1.\n2.\n-");

    let engine = engine(decomposition_corpus(), llm);
    let question = "Compare the braking models of the three systems";
    let result = engine.answer(Some("A009"), question).await;

    assert_eq!(result.sub_questions.len(), 1);
    assert_eq!(result.sub_questions[0].index, 0);
    assert_eq!(result.sub_questions[0].text, question);
    assert!(!result.passages.is_empty());
}

#[tokio::test]
async fn empty_index_reports_no_evidence_on_every_tier() {
    for id in ["B001", "I001", "A001"] {
        let llm = ScriptedLlm::answering("should never be used")
            .with_decomposition("1. a sub-question that goes nowhere");
        let engine = engine(MemoryIndex::new(), llm);

        let result = engine.answer(Some(id), "anything at all").await;

        assert!(
            result.answer.contains("No relevant information"),
            "tier {:?} did not signal missing evidence",
            result.tier
        );
        assert!(result.citations.is_empty());
        assert!(result.passages.is_empty());
    }
}

#[tokio::test]
async fn citations_always_trace_to_surfaced_passages() {
    let engine = engine(
        synthesis_corpus(),
        // The scripted answer cites a document that was never retrieved.
        ScriptedLlm::answering("Bogus grounding 【phantom.pdf, P99】"),
    );

    let result = engine.answer(Some("I020"), "signalling upgrade programme").await;

    let surfaced: HashSet<(String, u32)> = result
        .passages
        .iter()
        .map(|p| (p.source.clone(), p.page))
        .collect();

    for citation in &result.citations {
        assert!(
            surfaced.contains(&(citation.source.clone(), citation.page)),
            "citation {} not derivable from surfaced passages",
            citation.marker()
        );
    }
}

#[tokio::test]
async fn identical_requests_yield_identical_results() {
    let make_engine = || {
        engine(
            synthesis_corpus(),
            ScriptedLlm::answering("Deterministic answer."),
        )
    };

    let mut first = make_engine()
        .answer(Some("I010"), "signalling upgrade programme of the metro")
        .await;
    let mut second = make_engine()
        .answer(Some("I010"), "signalling upgrade programme of the metro")
        .await;

    // Wall-clock time is the only nondeterministic field.
    first.elapsed_secs = 0.0;
    second.elapsed_secs = 0.0;
    assert_eq!(first, second);
}

#[tokio::test]
async fn batch_isolates_generation_failures() {
    let llm = ScriptedLlm::answering("A fine answer. 【cbtc_overview.pdf, P3】")
        .failing_on("poison pill");
    let engine = engine(precise_corpus(), llm);

    let questions = vec![
        (Some("B001".to_string()), "poison pill CBTC".to_string()),
        (Some("B001".to_string()), "What is CBTC?".to_string()),
    ];

    let results = engine.answer_batch(&questions).await;
    assert_eq!(results.len(), 2);

    // The poisoned request degraded to an explicit error answer...
    assert!(results[0].answer.contains("could not be generated"));
    // ...without disturbing its sibling.
    assert!(results[1].answer.contains("A fine answer."));
    assert_eq!(results[1].citations.len(), 1);
}

#[tokio::test]
async fn answer_card_carries_the_payload_contract() {
    let engine = engine(
        precise_corpus(),
        ScriptedLlm::answering("CBTC answer. 【cbtc_overview.pdf, P3】"),
    );

    let card: AnswerCard = engine.answer_card(Some("B001"), "What is CBTC?").await;

    assert_eq!(card.query, "What is CBTC?");
    assert_eq!(card.result.len(), 1);
    assert_eq!(card.result[0].position, 1);
    assert_eq!(card.metadata.difficulty, "precise");
    assert_eq!(card.metadata.strategy, "precise_lookup");
    assert_eq!(card.metadata.sources, vec!["【cbtc_overview.pdf, P3】"]);
    assert!(card.metadata.time_used >= 0.0);
}
