//! Question oracles: anything that turns prompt context plus generation
//! parameters into raw questions.

use async_trait::async_trait;
use questgen_core::{GeneratedQuestion, GenerationParameters};
use tracing::{info, warn};

use crate::parse::parse_response;
use crate::prompt::{plan_distribution, question_prompt, SYSTEM_PROMPT};
use crate::provider::{LlmError, LlmProvider, Message};

const REPLY_PREVIEW_CHARS: usize = 200;

#[async_trait]
pub trait QuestionOracle: Send + Sync {
    fn name(&self) -> &str;

    async fn is_available(&self) -> bool;

    /// Questions for `context`. May return fewer than requested.
    async fn generate(
        &self,
        context: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<GeneratedQuestion>, LlmError>;
}

/// Oracle backed by a chat-completion provider: one request per planned
/// question, replies parsed with the labelled formats.
pub struct ChatOracle {
    name: String,
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatOracle {
    pub fn new(
        name: impl Into<String>,
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl QuestionOracle for ChatOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.provider.health_check().await
    }

    async fn generate(
        &self,
        context: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        let plan = plan_distribution(params);
        let topic = params
            .topics_filter
            .as_ref()
            .and_then(|topics| topics.first())
            .map(String::as_str)
            .unwrap_or("");

        info!(
            provider = %self.name,
            requested = params.num_questions,
            batches = plan.len(),
            "oracle generation started"
        );

        let mut questions = Vec::new();
        for batch in &plan {
            for _ in 0..batch.count {
                let messages = vec![
                    Message::system(SYSTEM_PROMPT),
                    Message::user(question_prompt(
                        context,
                        batch.question_type,
                        batch.difficulty,
                        topic,
                    )),
                ];

                let reply = match self
                    .provider
                    .complete(messages, self.temperature, self.max_tokens)
                    .await
                {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(
                            provider = %self.name,
                            question_type = %batch.question_type,
                            error = %e,
                            "question request failed"
                        );
                        continue;
                    }
                };

                match parse_response(&reply, batch.question_type, batch.difficulty, topic, context)
                {
                    Ok(question) => questions.push(question),
                    Err(e) => {
                        let preview: String = reply.chars().take(REPLY_PREVIEW_CHARS).collect();
                        warn!(
                            provider = %self.name,
                            error = %e,
                            reply_preview = %preview,
                            "unparseable reply skipped"
                        );
                    }
                }
            }
        }

        info!(
            provider = %self.name,
            generated = questions.len(),
            requested = params.num_questions,
            "oracle generation completed"
        );
        Ok(questions)
    }
}
