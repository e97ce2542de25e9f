use crate::error::AskError;
use crate::providers::traits::EmbeddingProvider;
use std::sync::Arc;

/// Embeds questions with the provider that built the index and checks the
/// result is comparable with the stored vectors.
#[derive(Clone)]
pub struct EmbeddingGenerator {
    provider: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
}

impl EmbeddingGenerator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, dimensions: usize) -> Self {
        Self { provider, dimensions }
    }

    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, AskError> {
        let embedding = self
            .provider
            .embed(text)
            .await
            .map_err(|e| AskError::EmbeddingService(e.to_string()))?;

        if self.dimensions != 0 && embedding.len() != self.dimensions {
            return Err(AskError::EmbeddingService(format!(
                "Generated embedding has wrong size: {} (expected {})",
                embedding.len(),
                self.dimensions
            )));
        }

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::utils::HashingEmbedder;

    #[tokio::test]
    async fn test_dimension_mismatch_is_an_error() {
        let generator = EmbeddingGenerator::new(Arc::new(HashingEmbedder::new(8)), 16);
        let result = generator.generate_embedding("hello").await;
        assert!(matches!(result, Err(AskError::EmbeddingService(_))));

        let generator = EmbeddingGenerator::new(Arc::new(HashingEmbedder::new(16)), 16);
        assert_eq!(generator.generate_embedding("hello").await.unwrap().len(), 16);
    }
}
