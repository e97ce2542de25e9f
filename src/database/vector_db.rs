use crate::error::IngestError;
use crate::providers::traits::EmbeddingProvider;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct IndexEntry {
    vector: Vec<f32>,
    chunk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub chunk: String,
    pub score: f32,
}

/// In-memory (vector, chunk) store searched by cosine similarity.
///
/// Built in one go from a chunk list and never updated afterwards; a new
/// upload produces a new index.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embeds `chunks` in batches of `batch_size` and stores them in order.
    pub async fn build(
        chunks: Vec<String>,
        embedder: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self, IngestError> {
        let batch_size = batch_size.max(1);
        let mut entries = Vec::with_capacity(chunks.len());
        let mut dimensions = 0;

        for batch in chunks.chunks(batch_size) {
            let vectors = embedder
                .embed_batch(batch)
                .await
                .map_err(|e| IngestError::EmbeddingService(e.to_string()))?;

            if vectors.len() != batch.len() {
                return Err(IngestError::EmbeddingService(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            for (vector, chunk) in vectors.into_iter().zip(batch) {
                if dimensions == 0 {
                    dimensions = vector.len();
                } else if vector.len() != dimensions {
                    return Err(IngestError::EmbeddingService(format!(
                        "inconsistent embedding dimensions: {} vs {}",
                        vector.len(),
                        dimensions
                    )));
                }
                entries.push(IndexEntry { vector, chunk: chunk.clone() });
            }
            debug!(embedded = entries.len(), total = chunks.len(), "embedded batch");
        }

        info!(
            chunks = entries.len(),
            dimensions,
            model = %embedder.model_name(),
            "vector index built"
        );
        Ok(Self { entries, dimensions })
    }

    /// Returns up to `k` chunks, most similar first. Equal scores keep
    /// insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(&entry.vector, query)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn chunks(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.chunk.as_str())
    }
}

/// Returns 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
