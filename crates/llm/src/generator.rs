//! Generation orchestrator: segment the source, build the prompt context,
//! resolve an oracle, then classify and reconcile every returned question.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use questgen_compute::{DifficultyAnalysis, DifficultyClassifier, TopicSegment, TopicSegmenter};
use questgen_core::config::GenerationConfig;
use questgen_core::{
    Config, DifficultyAuthority, DifficultyLevel, GeneratedQuestion, GenerationParameters,
    QuestionType,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::mock::{MockOracle, MOCK_PROVIDER};
use crate::oracle::QuestionOracle;
use crate::provider::LlmError;
use crate::registry::ProviderRegistry;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("requested {requested} questions, the limit is {max}")]
    TooManyQuestions { requested: usize, max: usize },
    #[error("request asks for no questions")]
    NoQuestions,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A generated question after local difficulty analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedQuestion {
    pub id: Uuid,
    pub question_type: QuestionType,
    pub content: String,
    pub options: Option<BTreeMap<String, String>>,
    pub correct_answer: String,
    pub justification: String,
    pub topic: String,
    pub source_excerpt: String,
    /// Difficulty the oracle was asked for.
    pub requested_difficulty: DifficultyLevel,
    /// Label after reconciliation with the classifier.
    pub difficulty: DifficultyLevel,
    pub difficulty_analysis: DifficultyAnalysis,
}

impl ClassifiedQuestion {
    fn new(
        question: GeneratedQuestion,
        analysis: DifficultyAnalysis,
        authority: DifficultyAuthority,
    ) -> Self {
        let difficulty = match authority {
            DifficultyAuthority::Classifier => analysis.level,
            DifficultyAuthority::Provider => question.difficulty,
        };
        Self {
            id: Uuid::new_v4(),
            question_type: question.question_type,
            content: question.content,
            options: question.options,
            correct_answer: question.correct_answer,
            justification: question.justification,
            topic: question.topic,
            source_excerpt: question.source_excerpt,
            requested_difficulty: question.difficulty,
            difficulty,
            difficulty_analysis: analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub provider: String,
    pub processing_time_ms: u64,
    pub topics_used: Vec<String>,
    pub total_generated: usize,
    pub parameters: GenerationParameters,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub questions: Vec<ClassifiedQuestion>,
    pub metadata: GenerationMetadata,
}

pub struct QuestionGenerator {
    config: Config,
    registry: ProviderRegistry,
    segmenter: Arc<TopicSegmenter>,
    classifier: Arc<DifficultyClassifier>,
}

impl QuestionGenerator {
    /// Segmenter settings come from `config.analysis`; the classifier uses
    /// its default weights and vocabularies.
    pub fn new(config: Config, registry: ProviderRegistry) -> Self {
        let segmenter = TopicSegmenter::new((&config.analysis).into());
        Self::with_components(config, registry, segmenter, DifficultyClassifier::default())
    }

    pub fn with_components(
        config: Config,
        registry: ProviderRegistry,
        segmenter: TopicSegmenter,
        classifier: DifficultyClassifier,
    ) -> Self {
        Self {
            config,
            registry,
            segmenter: Arc::new(segmenter),
            classifier: Arc::new(classifier),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run the full pipeline over already-normalized `text`.
    ///
    /// `provider` overrides `config.llm.provider`. An unknown or unavailable
    /// provider falls back to the first available registered one, then to
    /// the mock oracle.
    pub async fn generate(
        &self,
        text: &str,
        mut params: GenerationParameters,
        provider: Option<&str>,
    ) -> Result<GenerationOutcome, GenerationError> {
        let started = Instant::now();
        check_request(&params, &self.config.generation)?;

        let requested = provider.unwrap_or(&self.config.llm.provider);
        info!(
            provider = %requested,
            num_questions = params.num_questions,
            question_types = ?params.question_types,
            "question generation started"
        );

        // Clustering and classification are CPU-bound; keep them off the runtime.
        let segmenter = Arc::clone(&self.segmenter);
        let source = text.to_string();
        let segments = tokio::task::spawn_blocking(move || segmenter.segment(&source)).await?;
        let top = &segments[..segments.len().min(self.config.generation.context_topics)];
        let context = build_context(top, self.config.generation.context_chars_per_topic);
        let topics_used: Vec<String> = top.iter().map(|s| s.topic.clone()).collect();

        let oracle = self.resolve_oracle(requested).await;

        if params.topics_filter.as_ref().map_or(true, Vec::is_empty) {
            params.topics_filter = Some(topics_used.clone());
        }

        let generated = oracle.generate(&context, &params).await?;

        let authority = self.config.generation.difficulty_authority;
        let classifier = Arc::clone(&self.classifier);
        let questions = tokio::task::spawn_blocking(move || {
            classify_all(&classifier, generated, &context, authority)
        })
        .await?;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            provider = %oracle.name(),
            generated = questions.len(),
            elapsed_ms = processing_time_ms,
            "question generation completed"
        );

        Ok(GenerationOutcome {
            metadata: GenerationMetadata {
                provider: oracle.name().to_string(),
                processing_time_ms,
                topics_used,
                total_generated: questions.len(),
                parameters: params,
                generated_at: Utc::now(),
            },
            questions,
        })
    }

    /// One question of the given type, with the whole difficulty share on
    /// `difficulty`. `None` when the oracle produced nothing usable.
    pub async fn regenerate_single(
        &self,
        text: &str,
        question_type: QuestionType,
        difficulty: DifficultyLevel,
        topic: Option<&str>,
        provider: Option<&str>,
    ) -> Result<Option<ClassifiedQuestion>, GenerationError> {
        let params =
            GenerationParameters::single(question_type, difficulty, topic.map(str::to_string));
        let outcome = self.generate(text, params, provider).await?;
        Ok(outcome.questions.into_iter().next())
    }

    async fn resolve_oracle(&self, requested: &str) -> Box<dyn QuestionOracle> {
        match self.registry.create(requested, &self.config) {
            Ok(oracle) if oracle.is_available().await => return oracle,
            Ok(_) => warn!(provider = %requested, "provider unavailable"),
            Err(e) => warn!(provider = %requested, error = %e, "provider not usable"),
        }

        for name in self.registry.available(&self.config).await {
            if let Ok(oracle) = self.registry.create(&name, &self.config) {
                warn!(fallback = %name, "using fallback provider");
                return oracle;
            }
        }

        warn!(fallback = MOCK_PROVIDER, "no provider available, using mock");
        Box::new(MockOracle::new())
    }
}

fn classify_all(
    classifier: &DifficultyClassifier,
    generated: Vec<GeneratedQuestion>,
    context: &str,
    authority: DifficultyAuthority,
) -> Vec<ClassifiedQuestion> {
    generated
        .into_iter()
        .map(|question| {
            let analysis = classifier.classify(
                &format!("{} {}", question.content, question.justification),
                context,
            );
            if analysis.level != question.difficulty {
                debug!(
                    requested = %question.difficulty,
                    classified = %analysis.level,
                    score = analysis.score,
                    authority = ?authority,
                    "difficulty reclassified"
                );
            }
            ClassifiedQuestion::new(question, analysis, authority)
        })
        .collect()
}

fn check_request(
    params: &GenerationParameters,
    config: &GenerationConfig,
) -> Result<(), GenerationError> {
    if params.num_questions == 0 || params.question_types.is_empty() {
        return Err(GenerationError::NoQuestions);
    }
    if params.num_questions > config.max_questions_per_request {
        return Err(GenerationError::TooManyQuestions {
            requested: params.num_questions,
            max: config.max_questions_per_request,
        });
    }
    Ok(())
}

/// `"### {topic}\n{content}"` per segment, content cut to `max_chars`
/// characters, joined by a blank line.
pub fn build_context(segments: &[TopicSegment], max_chars: usize) -> String {
    segments
        .iter()
        .map(|s| {
            let content: String = s.content.chars().take(max_chars).collect();
            format!("### {}\n{}", s.topic, content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(topic: &str, content: &str) -> TopicSegment {
        TopicSegment {
            topic: topic.into(),
            content: content.into(),
            keywords: vec![],
            relevance_score: 1.0,
        }
    }

    #[test]
    fn context_truncates_by_characters() {
        let segments = [segment("Célula", "ação reação"), segment("Mercado", "oferta")];
        assert_eq!(
            build_context(&segments, 4),
            "### Célula\nação\n\n### Mercado\nofer"
        );
        assert_eq!(build_context(&[], 10), "");
    }

    #[test]
    fn request_limits() {
        let config = GenerationConfig::default();
        let too_many = GenerationParameters {
            num_questions: 21,
            ..GenerationParameters::default()
        };
        assert!(matches!(
            check_request(&too_many, &config),
            Err(GenerationError::TooManyQuestions { requested: 21, max: 20 })
        ));

        let none = GenerationParameters { num_questions: 0, ..GenerationParameters::default() };
        assert!(matches!(check_request(&none, &config), Err(GenerationError::NoQuestions)));

        let no_types = GenerationParameters {
            question_types: vec![],
            ..GenerationParameters::default()
        };
        assert!(matches!(check_request(&no_types, &config), Err(GenerationError::NoQuestions)));

        assert!(check_request(&GenerationParameters::default(), &config).is_ok());
    }
}
