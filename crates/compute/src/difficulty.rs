//! Question difficulty estimation from three independent text signals:
//! readability (lexical), technical density (conceptual) and word
//! sophistication (vocabulary).

use std::collections::HashSet;
use std::sync::LazyLock;

use questgen_core::DifficultyLevel;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::{sentence_count, syllable_count, words};

/// Composite scores below this are easy.
pub const EASY_THRESHOLD: f64 = 0.35;
/// Composite scores below this (and not easy) are medium.
pub const MEDIUM_THRESHOLD: f64 = 0.65;

/// Sub-score reported when the text has no words.
const NEUTRAL_SCORE: f64 = 0.5;
/// Sub-scores above this are named in the explanation.
const NOTABLE_FACTOR: f64 = 0.6;
const MAX_COUNTED_CONNECTORS: f64 = 3.0;
const LONG_TEXT_CHARS: usize = 300;
const LONG_WORD_CHARS: usize = 10;

pub const TECHNICAL_TERMS: &[&str] = &[
    "algoritmo", "paradigma", "metodologia", "epistemológico", "heurística", "ontologia",
    "axioma", "teorema", "hipótese", "correlação", "causalidade", "inferência", "dedução",
    "indução", "abstração", "concretização", "framework", "arquitetura", "implementação",
    "instância", "herança", "polimorfismo", "encapsulamento", "recursividade", "complexidade",
];

pub const COMPLEX_CONNECTORS: &[&str] = &[
    "portanto", "consequentemente", "ademais", "outrossim", "destarte", "não obstante",
    "todavia", "entretanto", "conquanto", "porquanto", "mormente", "precipuamente",
    "sobretudo", "malgrado", "consoante",
];

static ENUMERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:primeiro|segundo|terceiro|a\)|b\)|c\)|I\)|II\)|III\))").unwrap()
});
static COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:enquanto|diferente|semelhante|comparado|relação)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierWeights {
    pub lexical: f64,
    pub conceptual: f64,
    pub vocabulary: f64,
}

impl Default for ClassifierWeights {
    fn default() -> Self {
        Self {
            lexical: 0.30,
            conceptual: 0.50,
            vocabulary: 0.20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub weights: ClassifierWeights,
    pub technical_terms: HashSet<String>,
    /// Matched as substrings of the lowercased text, so multi-word
    /// connectors work.
    pub complex_connectors: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: ClassifierWeights::default(),
            technical_terms: TECHNICAL_TERMS.iter().map(|t| t.to_string()).collect(),
            complex_connectors: COMPLEX_CONNECTORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAnalysis {
    pub level: DifficultyLevel,
    pub score: f64,
    pub lexical_score: f64,
    pub conceptual_score: f64,
    pub vocabulary_score: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Default)]
pub struct DifficultyClassifier {
    config: ClassifierConfig,
}

impl DifficultyClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Score `text` and map the weighted composite to a level.
    ///
    /// `context` is the source material the question came from. It is
    /// accepted for callers that have it but does not affect the scores.
    pub fn classify(&self, text: &str, context: &str) -> DifficultyAnalysis {
        let lexical = lexical_score(text);
        let conceptual = conceptual_score(text, &self.config);
        let vocabulary = vocabulary_score(text);

        let w = &self.config.weights;
        let score = (lexical * w.lexical + conceptual * w.conceptual + vocabulary * w.vocabulary)
            .clamp(0.0, 1.0);
        let level = level_for_score(score);

        debug!(
            level = %level,
            score,
            lexical,
            conceptual,
            vocabulary,
            context_chars = context.len(),
            "question classified"
        );

        DifficultyAnalysis {
            level,
            score,
            lexical_score: lexical,
            conceptual_score: conceptual,
            vocabulary_score: vocabulary,
            explanation: explanation(level, lexical, conceptual, vocabulary),
        }
    }
}

/// [`DifficultyClassifier::classify`] with the default configuration.
pub fn classify(text: &str, context: &str) -> DifficultyAnalysis {
    DifficultyClassifier::default().classify(text, context)
}

pub fn level_for_score(score: f64) -> DifficultyLevel {
    if score < EASY_THRESHOLD {
        DifficultyLevel::Easy
    } else if score < MEDIUM_THRESHOLD {
        DifficultyLevel::Medium
    } else {
        DifficultyLevel::Hard
    }
}

/// Inverted Flesch reading ease: `1 - clamp(flesch, 0, 100) / 100`.
pub fn lexical_score(text: &str) -> f64 {
    let words = words(text);
    let sentences = sentence_count(text);
    if words.is_empty() || sentences == 0 {
        return NEUTRAL_SCORE;
    }

    let word_count = words.len() as f64;
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();
    let avg_sentence_length = word_count / sentences as f64;
    let avg_syllables_per_word = syllables as f64 / word_count;

    let flesch = 206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word;
    1.0 - flesch.clamp(0.0, 100.0) / 100.0
}

/// `(2 × technical ratio + connector score + structure bonus) / 3`, capped
/// at 1.
pub fn conceptual_score(text: &str, config: &ClassifierConfig) -> f64 {
    let words = words(text);
    if words.is_empty() {
        return NEUTRAL_SCORE;
    }

    let technical = words
        .iter()
        .filter(|w| config.technical_terms.contains(w.as_str()))
        .count();
    let technical_ratio = technical as f64 / words.len() as f64;

    let lowered = text.to_lowercase();
    let connectors = config
        .complex_connectors
        .iter()
        .filter(|c| lowered.contains(c.as_str()))
        .count();
    let connector_score = (connectors as f64 / MAX_COUNTED_CONNECTORS).min(1.0);

    let mut structure = 0.0;
    if ENUMERATION.is_match(text) {
        structure += 0.3;
    }
    if COMPARISON.is_match(&lowered) {
        structure += 0.3;
    }
    if text.chars().count() > LONG_TEXT_CHARS {
        structure += 0.2;
    }

    ((2.0 * technical_ratio + connector_score + structure) / 3.0).min(1.0)
}

/// Mean of normalized average word length, type-token ratio and twice the
/// share of words over ten characters, clamped to [0, 1].
pub fn vocabulary_score(text: &str) -> f64 {
    let words = words(text);
    if words.is_empty() {
        return NEUTRAL_SCORE;
    }

    let word_count = words.len() as f64;
    let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();

    let avg_length = lengths.iter().sum::<usize>() as f64 / word_count;
    let length_score = ((avg_length - 4.0) / 6.0).clamp(0.0, 1.0);

    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let type_token_ratio = unique.len() as f64 / word_count;

    let long_ratio = lengths.iter().filter(|&&l| l > LONG_WORD_CHARS).count() as f64 / word_count;

    ((length_score + type_token_ratio + 2.0 * long_ratio) / 3.0).clamp(0.0, 1.0)
}

fn explanation(level: DifficultyLevel, lexical: f64, conceptual: f64, vocabulary: f64) -> String {
    let base = match level {
        DifficultyLevel::Easy => "Questão com linguagem acessível e conceitos básicos.",
        DifficultyLevel::Medium => {
            "Questão com complexidade moderada, requerendo compreensão intermediária."
        }
        DifficultyLevel::Hard => {
            "Questão com alta complexidade conceitual e vocabulário técnico avançado."
        }
    };

    let mut factors = Vec::new();
    if lexical > NOTABLE_FACTOR {
        factors.push("estrutura textual elaborada");
    }
    if conceptual > NOTABLE_FACTOR {
        factors.push("múltiplos conceitos interrelacionados");
    }
    if vocabulary > NOTABLE_FACTOR {
        factors.push("vocabulário técnico especializado");
    }

    if factors.is_empty() {
        base.to_string()
    } else {
        format!("{base} Fatores: {}.", factors.join(", "))
    }
}
