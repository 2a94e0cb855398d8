//! Name → oracle constructor table, built once at startup and handed to
//! the generator.

use questgen_core::config::usable_key;
use questgen_core::Config;
use tracing::debug;

use crate::mock::{MockOracle, MOCK_PROVIDER};
use crate::oracle::{ChatOracle, QuestionOracle};
use crate::provider::LlmError;
use crate::providers::{openai, ClaudeProvider, GeminiProvider, OllamaProvider, OpenAiProvider};

pub type OracleConstructor =
    Box<dyn Fn(&Config) -> Result<Box<dyn QuestionOracle>, LlmError> + Send + Sync>;

#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<(String, OracleConstructor)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// openai, claude (alias anthropic), gemini, ollama and mock.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("openai", create_openai);
        registry.register("claude", create_claude);
        registry.register("anthropic", create_claude);
        registry.register("gemini", create_gemini);
        registry.register("ollama", create_ollama);
        registry.register(MOCK_PROVIDER, |_: &Config| {
            Ok(Box::new(MockOracle::new()) as Box<dyn QuestionOracle>)
        });
        registry
    }

    /// Add a constructor, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        F: Fn(&Config) -> Result<Box<dyn QuestionOracle>, LlmError> + Send + Sync + 'static,
    {
        let name = name.to_lowercase();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, Box::new(constructor)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries.iter().any(|(existing, _)| *existing == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn create(&self, name: &str, config: &Config) -> Result<Box<dyn QuestionOracle>, LlmError> {
        let name = name.to_lowercase();
        let (_, constructor) = self
            .entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .ok_or_else(|| {
                LlmError::NotConfigured(format!(
                    "unknown question provider '{}', registered: {}",
                    name,
                    self.names().join(", ")
                ))
            })?;
        constructor(config)
    }

    /// Names whose constructor succeeds and whose oracle reports itself
    /// available, in registration order.
    pub async fn available(&self, config: &Config) -> Vec<String> {
        let mut names = Vec::new();
        for (name, constructor) in &self.entries {
            match constructor(config) {
                Ok(oracle) if oracle.is_available().await => names.push(name.clone()),
                Ok(_) => debug!(provider = %name, "provider unavailable"),
                Err(e) => debug!(provider = %name, error = %e, "provider not constructible"),
            }
        }
        names
    }
}

fn api_key(key: &Option<String>, var: &str) -> Result<String, LlmError> {
    usable_key(key)
        .map(str::to_string)
        .ok_or_else(|| LlmError::NotConfigured(format!("{var} not set")))
}

fn chat_oracle(
    name: &str,
    provider: impl crate::provider::LlmProvider + 'static,
    config: &Config,
) -> Box<dyn QuestionOracle> {
    Box::new(ChatOracle::new(
        name,
        Box::new(provider),
        config.llm.temperature,
        config.llm.max_tokens,
    ))
}

fn create_openai(config: &Config) -> Result<Box<dyn QuestionOracle>, LlmError> {
    let api_key = api_key(&config.llm.openai_api_key, "OPENAI_API_KEY")?;
    let base_url = config
        .llm
        .openai_base_url
        .as_deref()
        .unwrap_or(openai::DEFAULT_BASE_URL);
    let provider =
        OpenAiProvider::new(api_key, config.llm.openai_model.clone(), base_url.to_string());
    Ok(chat_oracle("openai", provider, config))
}

fn create_claude(config: &Config) -> Result<Box<dyn QuestionOracle>, LlmError> {
    let api_key = api_key(&config.llm.anthropic_api_key, "ANTHROPIC_API_KEY")?;
    let provider = ClaudeProvider::new(api_key, config.llm.anthropic_model.clone());
    Ok(chat_oracle("claude", provider, config))
}

fn create_gemini(config: &Config) -> Result<Box<dyn QuestionOracle>, LlmError> {
    let api_key = api_key(&config.llm.google_api_key, "GOOGLE_API_KEY")?;
    let provider = GeminiProvider::new(api_key, config.llm.gemini_model.clone());
    Ok(chat_oracle("gemini", provider, config))
}

fn create_ollama(config: &Config) -> Result<Box<dyn QuestionOracle>, LlmError> {
    let provider = OllamaProvider::new(config.ollama.url.clone(), config.ollama.model.clone());
    Ok(chat_oracle("ollama", provider, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_registered_in_order() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["openai", "claude", "anthropic", "gemini", "ollama", "mock"]
        );
        assert!(registry.contains("Claude"));
    }

    #[test]
    fn missing_key_is_not_configured() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry.create("openai", &Config::default()).err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(ref msg) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn placeholder_key_is_not_configured() {
        let mut config = Config::default();
        config.llm.anthropic_api_key = Some("sk-sua-chave-aqui".into());
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.create("anthropic", &config).is_err());

        config.llm.anthropic_api_key = Some("sk-ant-real".into());
        let oracle = registry.create("anthropic", &config).unwrap();
        assert_eq!(oracle.name(), "claude");
    }

    #[test]
    fn unknown_name_lists_registered_providers() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry.create("watson", &Config::default()).err().unwrap();
        assert!(err.to_string().contains("watson"));
        assert!(err.to_string().contains("mock"));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ProviderRegistry::new();
        registry
            .register("mock", |_: &Config| Err(LlmError::NotConfigured("first".into())))
            .register("MOCK", |_: &Config| {
                Ok(Box::new(MockOracle::new()) as Box<dyn QuestionOracle>)
            });
        assert_eq!(registry.names(), vec!["mock"]);
        assert!(registry.create("mock", &Config::default()).is_ok());
    }

    #[tokio::test]
    async fn available_skips_unconstructible_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register("openai", create_openai);
        registry.register("mock", |_: &Config| {
            Ok(Box::new(MockOracle::new()) as Box<dyn QuestionOracle>)
        });
        assert_eq!(registry.available(&Config::default()).await, vec!["mock"]);
    }
}
