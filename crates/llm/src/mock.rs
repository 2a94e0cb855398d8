//! Deterministic oracle for tests and offline use.

use std::collections::BTreeMap;

use async_trait::async_trait;
use questgen_core::{DifficultyLevel, GeneratedQuestion, GenerationParameters, QuestionType};
use tracing::info;

use crate::oracle::QuestionOracle;
use crate::provider::LlmError;

pub const MOCK_PROVIDER: &str = "mock";

const FALLBACK_TOPIC: &str = "Conceito";
const KEYWORD_SCAN_WORDS: usize = 100;
const SOURCE_EXCERPT_CHARS: usize = 200;

/// Template questions, no network. Produces exactly `num_questions`,
/// cycling through the requested types and through easy, medium, hard.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockOracle;

impl MockOracle {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuestionOracle for MockOracle {
    fn name(&self) -> &str {
        MOCK_PROVIDER
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        context: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        info!(num_questions = params.num_questions, "mock generation started");

        let topic = params
            .topics_filter
            .as_ref()
            .and_then(|topics| topics.first().cloned())
            .unwrap_or_else(|| context_topic(context));
        let excerpt: String = context.chars().take(SOURCE_EXCERPT_CHARS).collect();

        let questions = (0..params.num_questions)
            .map(|i| {
                let question_type = if params.question_types.is_empty() {
                    QuestionType::MultipleChoice
                } else {
                    params.question_types[i % params.question_types.len()]
                };
                let difficulty = DifficultyLevel::ALL[i % DifficultyLevel::ALL.len()];
                template_question(i + 1, question_type, difficulty, &topic, &excerpt)
            })
            .collect::<Vec<_>>();

        info!(questions = questions.len(), "mock generation completed");
        Ok(questions)
    }
}

/// First word longer than five characters among the leading words.
fn context_topic(context: &str) -> String {
    context
        .split_whitespace()
        .take(KEYWORD_SCAN_WORDS)
        .find(|w| w.chars().count() > 5)
        .unwrap_or(FALLBACK_TOPIC)
        .to_string()
}

fn template_question(
    number: usize,
    question_type: QuestionType,
    difficulty: DifficultyLevel,
    topic: &str,
    excerpt: &str,
) -> GeneratedQuestion {
    let (content, options, correct_answer, justification) = match question_type {
        QuestionType::MultipleChoice => (
            format!(
                "Questão {number}: Com base no conteúdo apresentado sobre {topic}, qual das \
                 alternativas abaixo melhor descreve o conceito principal?"
            ),
            Some(BTreeMap::from([
                (
                    "A".to_string(),
                    format!("A primeira característica importante de {topic} é sua aplicação prática no contexto acadêmico."),
                ),
                (
                    "B".to_string(),
                    format!("A segunda perspectiva sobre {topic} enfatiza aspectos teóricos fundamentais."),
                ),
                (
                    "C".to_string(),
                    format!("Uma visão alternativa de {topic} que considera fatores secundários."),
                ),
                (
                    "D".to_string(),
                    format!("Uma interpretação incorreta que confunde {topic} com conceitos relacionados."),
                ),
            ])),
            "A".to_string(),
            format!(
                "A alternativa A está correta pois descreve adequadamente a aplicação prática \
                 de {topic} conforme apresentado no texto. As demais alternativas apresentam \
                 interpretações parciais ou incorretas do conceito."
            ),
        ),
        QuestionType::TrueFalse => {
            let is_true = number % 2 == 0;
            let (answer, verdict, relation) = if is_true {
                ("V", "verdadeira", "confirma")
            } else {
                ("F", "falsa", "contradiz")
            };
            (
                format!(
                    "Questão {number}: O conceito de {topic} apresentado no texto estabelece \
                     que sua principal característica é a aplicabilidade em contextos diversos."
                ),
                None,
                answer.to_string(),
                format!(
                    "A afirmação é {verdict} porque o texto {relation} essa interpretação ao \
                     apresentar {topic}."
                ),
            )
        }
        QuestionType::Essay => (
            format!(
                "Questão {number}: Discorra sobre os principais aspectos de {topic} apresentados \
                 no texto, relacionando-os com sua aplicação prática no contexto acadêmico brasileiro."
            ),
            None,
            crate::parse::ESSAY_CORRECT_ANSWER.to_string(),
            format!(
                "Resposta Esperada:\n1) Definição de {topic}; 2) Principais características; \
                 3) Aplicações práticas; 4) Relevância no contexto brasileiro."
            ),
        ),
    };

    GeneratedQuestion {
        question_type,
        content,
        options,
        correct_answer,
        justification,
        difficulty,
        topic: topic.to_string(),
        source_excerpt: excerpt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_exactly_the_requested_count() {
        let params = GenerationParameters {
            num_questions: 7,
            question_types: vec![QuestionType::MultipleChoice, QuestionType::Essay],
            ..GenerationParameters::default()
        };
        let questions = MockOracle.generate("texto curto", &params).await.unwrap();

        assert_eq!(questions.len(), 7);
        assert_eq!(questions[0].question_type, QuestionType::MultipleChoice);
        assert_eq!(questions[1].question_type, QuestionType::Essay);
        assert_eq!(questions[0].options.as_ref().unwrap().len(), 4);
        assert!(questions[1].options.is_none());
    }

    #[tokio::test]
    async fn difficulty_cycles_in_order() {
        let params = GenerationParameters { num_questions: 4, ..GenerationParameters::default() };
        let questions = MockOracle.generate("", &params).await.unwrap();
        let levels: Vec<_> = questions.iter().map(|q| q.difficulty).collect();
        assert_eq!(
            levels,
            vec![
                DifficultyLevel::Easy,
                DifficultyLevel::Medium,
                DifficultyLevel::Hard,
                DifficultyLevel::Easy,
            ]
        );
    }

    #[tokio::test]
    async fn topic_prefers_filter_then_context_word() {
        let mut params = GenerationParameters { num_questions: 1, ..GenerationParameters::default() };
        let from_context = MockOracle.generate("a vida da membrana celular", &params).await.unwrap();
        assert_eq!(from_context[0].topic, "membrana");

        let fallback = MockOracle.generate("sol e mar", &params).await.unwrap();
        assert_eq!(fallback[0].topic, FALLBACK_TOPIC);

        params.topics_filter = Some(vec!["Genética".into()]);
        let filtered = MockOracle.generate("a vida da membrana", &params).await.unwrap();
        assert_eq!(filtered[0].topic, "Genética");
        assert!(filtered[0].content.contains("Genética"));
    }

    #[tokio::test]
    async fn true_false_answers_alternate() {
        let params = GenerationParameters {
            num_questions: 2,
            question_types: vec![QuestionType::TrueFalse],
            ..GenerationParameters::default()
        };
        let questions = MockOracle.generate("", &params).await.unwrap();
        assert_eq!(questions[0].correct_answer, "F");
        assert_eq!(questions[1].correct_answer, "V");
    }
}
