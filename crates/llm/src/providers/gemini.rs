use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini `generateContent`. The API key travels as a query
/// parameter.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// System text goes to `system_instruction`; assistant turns are sent
    /// with the `model` role.
    fn build_request_body(messages: &[Message], temperature: f32, max_tokens: u32) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        for message in messages {
            match message.role {
                Role::System => system_parts.push(text_part(&message.content)),
                Role::User => contents.push(turn("user", &message.content)),
                Role::Assistant => contents.push(turn("model", &message.content)),
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });
        if !system_parts.is_empty() {
            body["system_instruction"] = json!({ "parts": system_parts });
        }
        body
    }
}

fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

fn turn(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [text_part(text)] })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = Self::build_request_body(&messages, temperature, max_tokens);

        debug!(model = %self.model, "gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: Value = response.json().await?;
        resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::ParseError("missing candidates[0].content.parts[0].text".into())
            })
    }
}
