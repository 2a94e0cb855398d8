use std::path::Path;

use anyhow::{Context, Result};
use questgen_compute::{DifficultyClassifier, SegmenterConfig, TopicSegmenter, TopicSummary};
use questgen_core::{Config, DifficultyLevel, GenerationParameters, QuestionType};
use questgen_ingest::{process_file, ContentValidation, ContentValidator, Normalizer, ProcessedDocument};
use questgen_llm::{ProviderRegistry, QuestionGenerator};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub content_hash: String,
    pub validation: ContentValidation,
    pub preview: String,
    pub topics: Vec<TopicSummary>,
}

pub fn analyze(
    config: &Config,
    file: &Path,
    min_words: Option<usize>,
    topics: Option<usize>,
) -> Result<AnalysisReport> {
    let validator = min_words
        .map(ContentValidator::new)
        .unwrap_or_else(|| ContentValidator::from(&config.ingest));
    let doc = load_document(config, file, &validator)?;

    let mut segmenter_config = SegmenterConfig::from(&config.analysis);
    if let Some(topics) = topics {
        segmenter_config.topic_count = topics;
    }
    let topics = TopicSegmenter::new(segmenter_config).analyze_topics(&doc.text);

    Ok(AnalysisReport {
        content_hash: doc.content_hash,
        validation: doc.validation,
        preview: doc.preview,
        topics,
    })
}

pub fn classify(text: &str, context: &str) -> questgen_compute::DifficultyAnalysis {
    DifficultyClassifier::default().classify(text, context)
}

pub async fn generate(
    config: Config,
    file: &Path,
    params: GenerationParameters,
    provider: Option<&str>,
) -> Result<questgen_llm::GenerationOutcome> {
    let doc = load_document(&config, file, &ContentValidator::from(&config.ingest))?;
    let generator = QuestionGenerator::new(config, ProviderRegistry::with_defaults());
    generator
        .generate(&doc.text, params, provider)
        .await
        .context("question generation failed")
}

pub async fn regenerate(
    config: Config,
    file: &Path,
    question_type: QuestionType,
    difficulty: DifficultyLevel,
    topic: Option<&str>,
    provider: Option<&str>,
) -> Result<Option<questgen_llm::ClassifiedQuestion>> {
    let doc = load_document(&config, file, &ContentValidator::from(&config.ingest))?;
    let generator = QuestionGenerator::new(config, ProviderRegistry::with_defaults());
    generator
        .regenerate_single(&doc.text, question_type, difficulty, topic, provider)
        .await
        .context("question regeneration failed")
}

fn load_document(
    config: &Config,
    file: &Path,
    validator: &ContentValidator,
) -> Result<ProcessedDocument> {
    let normalizer = Normalizer::new((&config.ingest).into());
    let doc = process_file(file, &normalizer, validator)
        .with_context(|| format!("failed to read {}", file.display()))?;

    if !doc.validation.is_sufficient {
        warn!(
            file = %file.display(),
            words = doc.validation.word_count,
            "document content is below the recommended size"
        );
    }
    Ok(doc)
}
