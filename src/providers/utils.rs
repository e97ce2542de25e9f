use anyhow::Result;
use async_trait::async_trait;
use crate::providers::traits::EmbeddingProvider;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const HASHING_EMBEDDING_DIMENSIONS: usize = 256;

/// Deterministic bag-of-trigrams embedder. Needs no network, so the whole
/// pipeline can be exercised without an API key.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let chars: Vec<char> = text.to_lowercase().chars().collect();

        if chars.len() < 3 {
            if !chars.is_empty() {
                vector[self.bucket(&chars)] += 1.0;
            }
        } else {
            for window in chars.windows(3) {
                vector[self.bucket(window)] += 1.0;
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn bucket(&self, gram: &[char]) -> usize {
        let mut hasher = DefaultHasher::new();
        gram.hash(&mut hasher);
        (hasher.finish() % self.dimensions as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(HASHING_EMBEDDING_DIMENSIONS)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn model_name(&self) -> String {
        format!("hashing-trigram-{}", self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hashing_embedding_is_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("invoice total").await.unwrap();
        let b = embedder.embed("invoice total").await.unwrap();
        assert_eq!(a.len(), HASHING_EMBEDDING_DIMENSIONS);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hashing_embedding_is_normalized() {
        let embedder = HashingEmbedder::new(32);
        let v = embedder.embed("some longer text to embed").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        let empty = embedder.embed("").await.unwrap();
        assert!(empty.iter().all(|&x| x == 0.0));
    }
}
