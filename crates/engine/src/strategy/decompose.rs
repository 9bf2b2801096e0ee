//! Multi-Document-Decomposition pipeline.
//!
//! The generation collaborator first splits the question into 2-4
//! independent sub-questions. Each sub-question runs its own wide retrieval
//! round and partial answer concurrently (the rounds share no mutable state;
//! dropping the parent future cancels all of them). A final synthesis call
//! joins the partial answers and attributes corroborating or differing
//! information to its source document.

use crate::attribution::dedup_citations;
use crate::strategy::{
    generate_or_error_answer, PipelineContext, PipelineOutcome, NO_EVIDENCE_ANSWER,
};
use crate::types::{Citation, PassageChunk, SubQuestionReport};
use futures::future::join_all;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Passages given to one sub-question's answer prompt.
const SUB_PROMPT_PASSAGES: usize = 2;

/// Character budget per passage in a sub-question prompt.
const SUB_PROMPT_PASSAGE_CHARS: usize = 400;

/// Passages quoted in the final synthesis prompt.
const FINAL_PROMPT_PASSAGES: usize = 5;

/// Character budget per passage in the final synthesis prompt.
const FINAL_PROMPT_PASSAGE_CHARS: usize = 300;

/// Character budget per partial answer in the final synthesis prompt.
const SUB_ANSWER_SUMMARY_CHARS: usize = 200;

/// Lines shorter than this after numbering removal are noise, not questions.
const MIN_SUB_QUESTION_CHARS: usize = 6;

pub(crate) async fn run(question: &str, ctx: &PipelineContext<'_>) -> PipelineOutcome {
    let sub_texts = decompose_question(question, ctx).await;

    tracing::info!("Decomposed into {} sub-questions", sub_texts.len());

    // Independent rounds, joined before synthesis. This is the pipeline's
    // only synchronization barrier.
    let rounds = join_all(
        sub_texts
            .iter()
            .enumerate()
            .map(|(index, text)| sub_question_round(index, text, ctx)),
    )
    .await;

    // Union of surfaced passages across rounds, deduplicated by identity,
    // kept in sub-question-index order.
    let mut seen = HashSet::new();
    let mut surfaced: Vec<PassageChunk> = Vec::new();
    for round in &rounds {
        for chunk in &round.passages {
            if seen.insert((chunk.source.clone(), chunk.page, chunk.seq)) {
                surfaced.push(chunk.clone());
            }
        }
    }

    let reports: Vec<SubQuestionReport> = rounds.into_iter().map(|r| r.report).collect();

    if surfaced.is_empty() {
        return PipelineOutcome {
            raw_answer: NO_EVIDENCE_ANSWER.to_string(),
            surfaced,
            sub_questions: reports,
        };
    }

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("sub_answers".to_string(), sub_answers_block(&reports));
    variables.insert("passages".to_string(), final_passages_block(&surfaced));

    let raw_answer = generate_or_error_answer(
        ctx,
        "decompose.final",
        &variables,
        ctx.config.final_temperature,
    )
    .await;

    PipelineOutcome {
        raw_answer,
        surfaced,
        sub_questions: reports,
    }
}

/// One sub-question's retrieval round plus partial answer.
struct SubRound {
    report: SubQuestionReport,
    passages: Vec<PassageChunk>,
}

async fn sub_question_round(index: usize, text: &str, ctx: &PipelineContext<'_>) -> SubRound {
    let passages: Vec<PassageChunk> =
        match ctx.gateway.retrieve(text, &ctx.config.decomposition).await {
            Ok(results) => results.into_iter().map(|(chunk, _)| chunk).collect(),
            Err(e) => {
                tracing::warn!("Sub-question {} retrieval unavailable: {}", index, e);
                Vec::new()
            }
        };

    let citations = dedup_citations(&passages);

    let answer = if passages.is_empty() {
        NO_EVIDENCE_ANSWER.to_string()
    } else {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), text.to_string());
        variables.insert(
            "passages".to_string(),
            sub_prompt_passages_block(&passages),
        );

        generate_or_error_answer(
            ctx,
            "decompose.sub_answer",
            &variables,
            ctx.config.base_temperature,
        )
        .await
    };

    SubRound {
        report: SubQuestionReport {
            index: index as u32,
            text: text.to_string(),
            answer,
            citations,
        },
        passages,
    }
}

/// Ask the collaborator to split the question; degrade to the original
/// question as the sole sub-question on malformed or failed output.
async fn decompose_question(question: &str, ctx: &PipelineContext<'_>) -> Vec<String> {
    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());

    match ctx
        .generator
        .generate("decompose.split", &variables, ctx.config.base_temperature)
        .await
    {
        Ok(text) => {
            let subs = parse_sub_questions(&text, ctx.config.max_sub_questions);
            if subs.is_empty() {
                tracing::warn!("Decomposition yielded no usable sub-questions; degrading");
                vec![question.to_string()]
            } else {
                subs
            }
        }
        Err(e) => {
            tracing::warn!("Decomposition call failed; degrading: {}", e);
            vec![question.to_string()]
        }
    }
}

/// Parse numbered sub-question lines, stripping leading enumeration.
fn parse_sub_questions(text: &str, max: usize) -> Vec<String> {
    let re = numbering_re();

    text.lines()
        .filter_map(|line| {
            let cleaned = re.replace(line.trim(), "").trim().to_string();
            (cleaned.chars().count() >= MIN_SUB_QUESTION_CHARS).then_some(cleaned)
        })
        .take(max)
        .collect()
}

fn numbering_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d.)\]、]+\s*").expect("literal pattern compiles"))
}

/// Passage block for one sub-question's answer prompt.
fn sub_prompt_passages_block(passages: &[PassageChunk]) -> String {
    passages
        .iter()
        .take(SUB_PROMPT_PASSAGES)
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[Passage {}] {}\n{}",
                i + 1,
                Citation::of(chunk).marker(),
                truncate_chars(&chunk.content, SUB_PROMPT_PASSAGE_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Condensed sub-question findings for the final synthesis prompt.
fn sub_answers_block(reports: &[SubQuestionReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let sources: Vec<String> = report
                .citations
                .iter()
                .take(2)
                .map(Citation::marker)
                .collect();
            format!(
                "{}. {}\n   {}\n   Sources: {}",
                report.index + 1,
                report.text,
                truncate_chars(&report.answer, SUB_ANSWER_SUMMARY_CHARS),
                sources.join(" ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Supporting-passage block for the final synthesis prompt.
fn final_passages_block(passages: &[PassageChunk]) -> String {
    passages
        .iter()
        .take(FINAL_PROMPT_PASSAGES)
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[Passage {}] {}\n{}",
                i + 1,
                Citation::of(chunk).marker(),
                truncate_chars(&chunk.content, FINAL_PROMPT_PASSAGE_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Char-boundary-safe truncation with an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
