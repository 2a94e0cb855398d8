//! Regex extraction of questions from the labelled reply formats requested
//! by [`crate::prompt::question_prompt`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use questgen_core::{DifficultyLevel, GeneratedQuestion, QuestionType};
use regex::Regex;

use crate::provider::LlmError;

const SOURCE_EXCERPT_CHARS: usize = 500;
pub const ESSAY_CORRECT_ANSWER: &str = "Ver resposta esperada";

static MC_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)QUEST[ÃA]O:\s*(.+?)\nA\)").unwrap());
static MC_OPTIONS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?s)A\)\s*(.+?)\nB\)").unwrap(),
        Regex::new(r"(?s)B\)\s*(.+?)\nC\)").unwrap(),
        Regex::new(r"(?s)C\)\s*(.+?)\nD\)").unwrap(),
        Regex::new(r"(?s)D\)\s*(.+?)\nRESPOSTA:").unwrap(),
    ]
});
static MC_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)RESPOSTA:\s*([A-D])").unwrap());

static TF_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)AFIRMA[ÇC][ÃA]O:\s*(.+?)\nRESPOSTA:").unwrap());
static TF_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)RESPOSTA:\s*([VF])").unwrap());

static JUSTIFICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)JUSTIFICATIVA:\s*(.+)$").unwrap());

static ESSAY_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)QUEST[ÃA]O:\s*(.+?)\nRESPOSTA_ESPERADA:").unwrap());
static ESSAY_EXPECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)RESPOSTA_ESPERADA:\s*(.+?)\nCRIT[ÉE]RIOS:").unwrap()
});
static ESSAY_CRITERIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)CRIT[ÉE]RIOS:\s*(.+)$").unwrap());

const OPTION_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

/// Parse one oracle reply. `context` supplies the source excerpt.
pub fn parse_response(
    reply: &str,
    question_type: QuestionType,
    difficulty: DifficultyLevel,
    topic: &str,
    context: &str,
) -> Result<GeneratedQuestion, LlmError> {
    let reply = reply.replace("\r\n", "\n");
    let (content, options, correct_answer, justification) = match question_type {
        QuestionType::MultipleChoice => parse_multiple_choice(&reply)?,
        QuestionType::TrueFalse => parse_true_false(&reply)?,
        QuestionType::Essay => parse_essay(&reply)?,
    };

    Ok(GeneratedQuestion {
        question_type,
        content,
        options,
        correct_answer,
        justification,
        difficulty,
        topic: topic.to_string(),
        source_excerpt: context.chars().take(SOURCE_EXCERPT_CHARS).collect(),
    })
}

type Parsed = (String, Option<BTreeMap<String, String>>, String, String);

fn parse_multiple_choice(reply: &str) -> Result<Parsed, LlmError> {
    let stem = capture(&MC_STEM, reply).ok_or_else(|| missing("QUESTÃO"))?;

    let mut options = BTreeMap::new();
    for (letter, pattern) in OPTION_LETTERS.iter().zip(MC_OPTIONS.iter()) {
        let text = capture(pattern, reply).ok_or_else(|| missing(&format!("{letter})")))?;
        options.insert(letter.to_string(), text);
    }

    let answer = capture(&MC_ANSWER, reply).ok_or_else(|| missing("RESPOSTA"))?;
    let justification = capture(&JUSTIFICATION, reply).unwrap_or_default();

    Ok((stem, Some(options), answer.to_uppercase(), justification))
}

fn parse_true_false(reply: &str) -> Result<Parsed, LlmError> {
    let statement = capture(&TF_STATEMENT, reply).ok_or_else(|| missing("AFIRMAÇÃO"))?;
    let answer = capture(&TF_ANSWER, reply).ok_or_else(|| missing("RESPOSTA"))?;
    let justification = capture(&JUSTIFICATION, reply).unwrap_or_default();

    Ok((statement, None, answer.to_uppercase(), justification))
}

/// Essays carry no single answer: expected points and grading criteria go
/// into the justification.
fn parse_essay(reply: &str) -> Result<Parsed, LlmError> {
    let stem = capture(&ESSAY_STEM, reply).ok_or_else(|| missing("QUESTÃO"))?;

    let mut justification = String::new();
    if let Some(expected) = capture(&ESSAY_EXPECTED, reply) {
        justification.push_str("Resposta Esperada:\n");
        justification.push_str(&expected);
    }
    if let Some(criteria) = capture(&ESSAY_CRITERIA, reply) {
        justification.push_str("\n\nCritérios:\n");
        justification.push_str(&criteria);
    }

    Ok((stem, None, ESSAY_CORRECT_ANSWER.to_string(), justification))
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn missing(label: &str) -> LlmError {
    LlmError::ParseError(format!("reply has no {label} section"))
}
