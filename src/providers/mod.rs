pub mod deepseek;
pub mod openai;
pub mod traits;
pub mod utils;

pub use deepseek::deepseek::DeepSeekProvider;
pub use openai::openai::OpenAIProvider;
pub use traits::{CompletionProvider, EmbeddingProvider};
pub use utils::HashingEmbedder;

use crate::config::{AppConfig, EmbeddingKind, ProviderKind};
use crate::error::ConfigError;
use std::sync::Arc;

/// Embedding backend selected by `PDFCHAT_EMBEDDING_PROVIDER`. Only the
/// OpenAI backend needs `OPENAI_API_KEY`.
pub fn build_embedder(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>, ConfigError> {
    match config.embedding_provider {
        EmbeddingKind::OpenAI => Ok(Arc::new(OpenAIProvider::new(
            config.openai_api_key()?,
            String::new(),
            &config.openai,
        ))),
        EmbeddingKind::Hashing => Ok(Arc::new(HashingEmbedder::default())),
    }
}

pub fn build_completion(
    config: &AppConfig,
    system_message: &str,
) -> Result<Arc<dyn CompletionProvider>, ConfigError> {
    match config.completion_provider {
        ProviderKind::OpenAI => Ok(Arc::new(OpenAIProvider::new(
            config.openai_api_key()?,
            system_message.to_string(),
            &config.openai,
        ))),
        ProviderKind::DeepSeek => Ok(Arc::new(DeepSeekProvider::new(
            config.deepseek_api_key()?,
            system_message.to_string(),
            &config.deepseek,
        ))),
    }
}
