use std::env;

use serde::{Deserialize, Serialize};

use crate::question::DifficultyAuthority;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub ingest: IngestConfig,
    pub analysis: AnalysisConfig,
    pub generation: GenerationConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `QUESTGEN_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("QUESTGEN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            ingest: IngestConfig::from_env_profiled(p),
            analysis: AnalysisConfig::from_env_profiled(p),
            generation: GenerationConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  ingest:      formats={}, min_words={}",
            self.ingest.allowed_extensions.join(","),
            self.ingest.min_content_words
        );
        tracing::info!(
            "  analysis:    topics={}, min_chunk_words={}, seed={}",
            self.analysis.topic_count,
            self.analysis.min_chunk_words,
            self.analysis.kmeans_seed
        );
        tracing::info!(
            "  generation:  max_questions={}, authority={:?}",
            self.generation.max_questions_per_request,
            self.generation.difficulty_authority
        );
        tracing::info!(
            "  llm:         provider={}, configured={}",
            self.llm.provider,
            self.llm.is_configured()
        );
        tracing::info!("  ollama:      url={}", self.ollama.url);
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "ingest": {
                "allowed_extensions": self.ingest.allowed_extensions,
                "max_file_size_mb": self.ingest.max_file_size_mb,
                "min_content_words": self.ingest.min_content_words,
            },
            "analysis": self.analysis,
            "generation": self.generation,
            "llm": {
                "provider": self.llm.provider,
                "openai_model": self.llm.openai_model,
                "anthropic_model": self.llm.anthropic_model,
                "gemini_model": self.llm.gemini_model,
                "configured": self.llm.is_configured(),
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.model },
        })
    }
}

impl Default for Config {
    /// Built-in defaults, ignoring the environment.
    fn default() -> Self {
        Self {
            profile: String::new(),
            ingest: IngestConfig::default(),
            analysis: AnalysisConfig::default(),
            generation: GenerationConfig::default(),
            llm: LlmConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// ── Ingest ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Lower-case extensions accepted by the normalizer.
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: u64,
    pub min_content_words: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: split_list("pdf,txt,docx"),
            max_file_size_mb: 20,
            min_content_words: 500,
        }
    }
}

impl IngestConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            allowed_extensions: split_list(&profiled_env_or(p, "ALLOWED_EXTENSIONS", "pdf,txt,docx")),
            max_file_size_mb: profiled_env_parse(p, "MAX_FILE_SIZE_MB", d.max_file_size_mb),
            min_content_words: profiled_env_parse(p, "MIN_CONTENT_WORDS", d.min_content_words),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

// ── Analysis (segmenter) ──────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub topic_count: usize,
    pub min_chunk_words: usize,
    pub tfidf_max_features: usize,
    pub tfidf_min_df: usize,
    pub tfidf_max_df: f64,
    pub kmeans_seed: u64,
    pub kmeans_restarts: usize,
    pub kmeans_max_iterations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            topic_count: 5,
            min_chunk_words: 100,
            tfidf_max_features: 1000,
            tfidf_min_df: 1,
            tfidf_max_df: 0.95,
            kmeans_seed: 42,
            kmeans_restarts: 10,
            kmeans_max_iterations: 300,
        }
    }
}

impl AnalysisConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            topic_count: profiled_env_parse(p, "TOPIC_COUNT", d.topic_count),
            min_chunk_words: profiled_env_parse(p, "MIN_CHUNK_WORDS", d.min_chunk_words),
            tfidf_max_features: profiled_env_parse(p, "TFIDF_MAX_FEATURES", d.tfidf_max_features),
            tfidf_min_df: profiled_env_parse(p, "TFIDF_MIN_DF", d.tfidf_min_df),
            tfidf_max_df: profiled_env_parse(p, "TFIDF_MAX_DF", d.tfidf_max_df),
            kmeans_seed: profiled_env_parse(p, "KMEANS_SEED", d.kmeans_seed),
            kmeans_restarts: profiled_env_parse(p, "KMEANS_RESTARTS", d.kmeans_restarts),
            kmeans_max_iterations: profiled_env_parse(
                p,
                "KMEANS_MAX_ITERATIONS",
                d.kmeans_max_iterations,
            ),
        }
    }
}

// ── Generation ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_questions_per_request: usize,
    /// How many of the most relevant topics feed the prompt context.
    pub context_topics: usize,
    pub context_chars_per_topic: usize,
    pub difficulty_authority: DifficultyAuthority,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_questions_per_request: 20,
            context_topics: 3,
            context_chars_per_topic: 2000,
            difficulty_authority: DifficultyAuthority::Classifier,
        }
    }
}

impl GenerationConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            max_questions_per_request: profiled_env_parse(
                p,
                "MAX_QUESTIONS_PER_REQUEST",
                d.max_questions_per_request,
            ),
            context_topics: profiled_env_parse(p, "CONTEXT_TOPICS", d.context_topics),
            context_chars_per_topic: profiled_env_parse(
                p,
                "CONTEXT_CHARS_PER_TOPIC",
                d.context_chars_per_topic,
            ),
            difficulty_authority: profiled_env_parse(
                p,
                "DIFFICULTY_AUTHORITY",
                d.difficulty_authority,
            ),
        }
    }
}

// ── LLM (OpenAI / Anthropic / Gemini) ────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "claude", "gemini", "ollama", "mock"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4-turbo-preview".to_string(),
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-sonnet-20241022".to_string(),
            google_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
        }
    }
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            provider: profiled_env_or(p, "AI_PROVIDER", &d.provider),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", &d.openai_model),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", &d.anthropic_model),
            google_api_key: profiled_env_opt(p, "GOOGLE_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", &d.gemini_model),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", d.temperature),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", d.max_tokens),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => usable_key(&self.openai_api_key).is_some(),
            "anthropic" | "claude" => usable_key(&self.anthropic_api_key).is_some(),
            "gemini" => usable_key(&self.google_api_key).is_some(),
            "ollama" | "mock" => true,
            _ => false,
        }
    }
}

/// Keys shipped in sample env files; treated as unset.
pub const PLACEHOLDER_KEY_PREFIX: &str = "sk-sua-";

/// The key, unless it is missing or still the sample placeholder.
pub fn usable_key(key: &Option<String>) -> Option<&str> {
    key.as_deref()
        .filter(|k| !k.starts_with(PLACEHOLDER_KEY_PREFIX))
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", &d.url),
            model: profiled_env_or(p, "OLLAMA_MODEL", &d.model),
        }
    }
}
