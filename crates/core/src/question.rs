use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Discrete difficulty label attached to every generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Label used inside the Portuguese prompt templates.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::Easy => "FÁCIL",
            Self::Medium => "MÉDIO",
            Self::Hard => "DIFÍCIL",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = CoreError;

    /// Accepts the English labels and the Portuguese ones the question
    /// bank historically stored (`facil`, `medio`, `dificil`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "facil" | "fácil" => Ok(Self::Easy),
            "medium" | "medio" | "médio" => Ok(Self::Medium),
            "hard" | "dificil" | "difícil" => Ok(Self::Hard),
            other => Err(CoreError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Shape of a generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Essay,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
            Self::Essay => "essay",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" | "mc" | "multipla_escolha" => Ok(Self::MultipleChoice),
            "true_false" | "tf" | "verdadeiro_falso" => Ok(Self::TrueFalse),
            "essay" | "dissertativa" => Ok(Self::Essay),
            other => Err(CoreError::UnknownQuestionType(other.to_string())),
        }
    }
}

/// A question as produced by a question oracle, before local classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question_type: QuestionType,
    pub content: String,
    /// Option letter → option text. Only present for multiple choice.
    pub options: Option<BTreeMap<String, String>>,
    pub correct_answer: String,
    pub justification: String,
    /// Difficulty the oracle was asked to produce.
    pub difficulty: DifficultyLevel,
    pub topic: String,
    pub source_excerpt: String,
}

/// What a generation request asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub num_questions: usize,
    pub question_types: Vec<QuestionType>,
    /// Share of questions per difficulty. Shares need not sum to 1.
    pub difficulty_distribution: BTreeMap<DifficultyLevel, f64>,
    pub topics_filter: Option<Vec<String>>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            num_questions: 10,
            question_types: vec![QuestionType::MultipleChoice],
            difficulty_distribution: BTreeMap::from([
                (DifficultyLevel::Easy, 0.3),
                (DifficultyLevel::Medium, 0.5),
                (DifficultyLevel::Hard, 0.2),
            ]),
            topics_filter: None,
        }
    }
}

impl GenerationParameters {
    /// Parameters for exactly one question of the given type and difficulty.
    pub fn single(
        question_type: QuestionType,
        difficulty: DifficultyLevel,
        topic: Option<String>,
    ) -> Self {
        Self {
            num_questions: 1,
            question_types: vec![question_type],
            difficulty_distribution: BTreeMap::from([(difficulty, 1.0)]),
            topics_filter: topic.filter(|t| !t.is_empty()).map(|t| vec![t]),
        }
    }
}

/// Which label wins when the local classifier disagrees with the difficulty
/// the oracle was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyAuthority {
    #[default]
    Classifier,
    Provider,
}

impl FromStr for DifficultyAuthority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classifier" => Ok(Self::Classifier),
            "provider" | "oracle" => Ok(Self::Provider),
            other => Err(CoreError::UnknownAuthority(other.to_string())),
        }
    }
}
