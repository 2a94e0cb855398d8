use std::collections::HashSet;

use questgen_core::config::IngestConfig;
use serde::{Deserialize, Serialize};

/// Tokens sampled from the start of the text for the language heuristic.
const LANGUAGE_SAMPLE_TOKENS: usize = 200;
/// Function-word hits needed to call the text Portuguese.
const LANGUAGE_MIN_MATCHES: usize = 5;

const PORTUGUESE_FUNCTION_WORDS: [&str; 13] = [
    "de", "da", "do", "que", "e", "em", "um", "uma", "para", "com", "não", "os", "as",
];

pub const LANGUAGE_PORTUGUESE: &str = "pt-BR";
pub const LANGUAGE_UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentValidation {
    pub word_count: usize,
    pub language: String,
    pub is_sufficient: bool,
    pub suggestions: Vec<String>,
}

/// Sufficiency check for normalized text.
pub fn validate(text: &str, min_words: usize) -> ContentValidation {
    let word_count = word_count(text);
    let language = detect_language(text);
    let is_sufficient = word_count >= min_words;

    let mut suggestions = Vec::new();
    if !is_sufficient {
        suggestions.push(format!(
            "O texto possui {word_count} palavras. Recomendamos pelo menos {min_words} \
             palavras para geração de questões de qualidade."
        ));
    }
    if language != LANGUAGE_PORTUGUESE {
        suggestions.push(
            "O idioma do texto não foi identificado claramente como português. \
             Isso pode afetar a qualidade das questões geradas."
                .to_string(),
        );
    }

    ContentValidation {
        word_count,
        language: language.to_string(),
        is_sufficient,
        suggestions,
    }
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Distinct Portuguese function words among the first tokens decide the
/// language; anything below the threshold is `"unknown"`.
pub fn detect_language(text: &str) -> &'static str {
    let sample: HashSet<String> = text
        .split_whitespace()
        .take(LANGUAGE_SAMPLE_TOKENS)
        .map(str::to_lowercase)
        .collect();

    let matches = PORTUGUESE_FUNCTION_WORDS
        .iter()
        .filter(|w| sample.contains(**w))
        .count();

    if matches >= LANGUAGE_MIN_MATCHES {
        LANGUAGE_PORTUGUESE
    } else {
        LANGUAGE_UNKNOWN
    }
}

/// [`validate`] with a configured minimum.
#[derive(Debug, Clone, Copy)]
pub struct ContentValidator {
    pub min_words: usize,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::from(&IngestConfig::default())
    }
}

impl From<&IngestConfig> for ContentValidator {
    fn from(config: &IngestConfig) -> Self {
        Self {
            min_words: config.min_content_words,
        }
    }
}

impl ContentValidator {
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }

    pub fn validate(&self, text: &str) -> ContentValidation {
        validate(text, self.min_words)
    }
}
