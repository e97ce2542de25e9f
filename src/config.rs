use crate::document::TextSplitter;
use crate::error::ConfigError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 64;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    DeepSeek,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Where chunk and question embeddings come from. `Hashing` needs no
/// network or API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    OpenAI,
    Hashing,
}

impl FromStr for EmbeddingKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(EmbeddingKind::OpenAI),
            "hashing" | "local" => Ok(EmbeddingKind::Hashing),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Settings for one remote provider, read from `<PREFIX>_*` variables.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub api_url: Option<String>,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        let api_key = env::var(format!("{}_API_KEY", prefix))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let chat_model = env::var(format!("{}_CHAT_MODEL", prefix))
            .or_else(|_| env::var(format!("{}_MODEL", prefix)))
            .unwrap_or_else(|_| match provider {
                "deepseek" => "deepseek-chat".to_string(),
                _ => "gpt-3.5-turbo".to_string(),
            });

        let embedding_model = env::var(format!("{}_EMBEDDING_MODEL", prefix))
            .unwrap_or_else(|_| "text-embedding-ada-002".to_string());

        let api_url = env::var(format!("{}_API_BASE", prefix)).ok();

        let temperature = env_parse(&format!("{}_TEMPERATURE", prefix), 0.7);

        Self {
            api_key,
            chat_model,
            embedding_model,
            api_url,
            temperature,
        }
    }
}

/// Pipeline knobs shared by every session.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub embed_batch_size: usize,
    pub condense_question: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            condense_question: false,
        }
    }
}

impl PipelineSettings {
    pub fn from_env() -> Self {
        Self {
            chunk_size: env_parse("PDFCHAT_CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
            chunk_overlap: env_parse("PDFCHAT_CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP),
            top_k: env_parse("PDFCHAT_TOP_K", DEFAULT_TOP_K),
            embed_batch_size: env_parse("PDFCHAT_EMBED_BATCH_SIZE", DEFAULT_EMBED_BATCH_SIZE),
            condense_question: env_parse("PDFCHAT_CONDENSE_QUESTION", false),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        TextSplitter::new(self.chunk_size, self.chunk_overlap).map(|_| ())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion_provider: ProviderKind,
    pub embedding_provider: EmbeddingKind,
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub pipeline: PipelineSettings,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Reads everything from the process environment. Call after `dotenv()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let completion_provider = match env::var("PDFCHAT_COMPLETION_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::OpenAI,
        };

        let embedding_provider = match env::var("PDFCHAT_EMBEDDING_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => EmbeddingKind::OpenAI,
        };

        let pipeline = PipelineSettings::from_env();
        pipeline.validate()?;

        Ok(Self {
            completion_provider,
            embedding_provider,
            openai: ProviderConfig::from_env("openai"),
            deepseek: ProviderConfig::from_env("deepseek"),
            pipeline,
            max_upload_bytes: env_parse("PDFCHAT_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    pub fn openai_api_key(&self) -> Result<String, ConfigError> {
        self.openai
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::Missing("OPENAI_API_KEY".to_string()))
    }

    pub fn deepseek_api_key(&self) -> Result<String, ConfigError> {
        self.deepseek
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::Missing("DEEPSEEK_API_KEY".to_string()))
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
