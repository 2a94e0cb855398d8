use std::path::PathBuf;

use clap::{Parser, Subcommand};
use questgen_core::{DifficultyLevel, QuestionType};

/// Academic question generation from course material.
///
/// Extracts and cleans document text, segments it into topics, asks an
/// LLM provider for questions and grades each question's difficulty.
#[derive(Parser, Debug)]
#[command(name = "questgen", version, about = "Academic question generation from course material")]
pub struct CliArgs {
    /// Config profile; keys are read as {PROFILE}_{KEY} before {KEY}
    #[arg(long, global = true, env = "QUESTGEN_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract, validate and segment a document; prints JSON
    Analyze {
        file: PathBuf,

        /// Minimum words for the content to count as sufficient
        #[arg(long)]
        min_words: Option<usize>,

        /// Number of topics to look for
        #[arg(long)]
        topics: Option<usize>,
    },

    /// Estimate the difficulty of a question text; prints JSON
    Classify {
        text: String,

        /// Source material the question came from
        #[arg(long, default_value = "")]
        context: String,
    },

    /// Generate questions from a document; prints JSON
    Generate {
        file: PathBuf,

        /// Provider name (openai, claude, gemini, ollama, mock)
        #[arg(long)]
        provider: Option<String>,

        /// Number of questions to request
        #[arg(long, default_value = "10")]
        count: usize,

        /// Question types, comma separated (multiple_choice, true_false, essay)
        #[arg(long, value_delimiter = ',', default_value = "multiple_choice")]
        types: Vec<QuestionType>,

        /// Restrict generation to these topics
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
    },

    /// Generate one question of a fixed type and difficulty; prints JSON
    Regenerate {
        file: PathBuf,

        #[arg(long = "type", default_value = "multiple_choice")]
        r#type: QuestionType,

        #[arg(long, default_value = "medium")]
        difficulty: DifficultyLevel,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        provider: Option<String>,
    },

    /// Print the effective configuration without secrets
    Config,
}
