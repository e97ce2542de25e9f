use async_trait::async_trait;
use anyhow::Result;
use crate::llm::memory::ConversationTurn;

/// Turns text into vectors. The same implementation must be used for
/// ingestion and for questions, otherwise similarity scores are meaningless.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Default implementation calls `embed` once per text, in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> String;
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Answers `prompt` given the prior turns of the conversation, oldest first.
    async fn complete(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String>;

    /// Name of the chat model, logged at startup.
    async fn get_model_info(&self) -> Result<String>;
}
