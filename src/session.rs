use crate::config::PipelineSettings;
use crate::database::VectorIndex;
use crate::document::{Document, TextExtractor, TextSplitter};
use crate::error::{AskError, ConfigError, IngestError};
use crate::llm::{ConversationTurn, ConversationalRetriever};
use crate::providers::traits::{CompletionProvider, EmbeddingProvider};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// The two remote capabilities the pipeline depends on.
#[derive(Clone)]
pub struct PipelineServices {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub completion: Arc<dyn CompletionProvider>,
}

/// What a successful ingestion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub documents: Vec<String>,
    pub characters: usize,
    pub chunks: usize,
}

enum SessionState {
    Uninitialized,
    Ready(ConversationalRetriever),
}

/// Everything one user works with: the current retriever (if any documents
/// have been ingested) and its chat history.
pub struct Session {
    id: Uuid,
    services: PipelineServices,
    settings: PipelineSettings,
    extractor: TextExtractor,
    splitter: TextSplitter,
    state: SessionState,
}

impl Session {
    pub fn new(services: PipelineServices, settings: PipelineSettings) -> Result<Self, ConfigError> {
        let splitter = TextSplitter::new(settings.chunk_size, settings.chunk_overlap)?;
        Ok(Self {
            id: Uuid::new_v4(),
            services,
            settings,
            extractor: TextExtractor::new(),
            splitter,
            state: SessionState::Uninitialized,
        })
    }

    /// Extracts, chunks and indexes `documents`. On success the previous
    /// index and history are replaced; on failure the session is unchanged.
    pub async fn ingest(&mut self, documents: Vec<Document>) -> Result<IngestSummary, IngestError> {
        let names: Vec<String> = documents.iter().map(|d| d.name.clone()).collect();
        info!(session = %self.id, documents = ?names, "ingesting documents");

        let extractor = self.extractor;
        let text = tokio::task::spawn_blocking(move || extractor.extract(&documents))
            .await
            .map_err(|e| IngestError::UnreadableDocument {
                name: names.join(", "),
                reason: format!("extraction task failed: {}", e),
            })??;

        let characters = text.chars().count();
        let chunks = self.splitter.split_text(&text);
        if chunks.is_empty() {
            warn!(session = %self.id, "uploaded documents contain no extractable text");
            return Err(IngestError::EmptyCorpus);
        }
        info!(
            session = %self.id,
            characters,
            chunks = chunks.len(),
            "corpus split"
        );

        let index = VectorIndex::build(
            chunks,
            self.services.embedder.as_ref(),
            self.settings.embed_batch_size,
        )
        .await?;

        let summary = IngestSummary {
            documents: names,
            characters,
            chunks: index.len(),
        };

        let retriever = ConversationalRetriever::new(
            index,
            self.services.embedder.clone(),
            self.services.completion.clone(),
            &self.settings,
        );
        self.state = SessionState::Ready(retriever);
        Ok(summary)
    }

    pub async fn ask(&mut self, question: &str) -> Result<String, AskError> {
        match &mut self.state {
            SessionState::Uninitialized => Err(AskError::NoIndexLoaded),
            SessionState::Ready(retriever) => retriever.ask(question).await,
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        match &self.state {
            SessionState::Uninitialized => &[],
            SessionState::Ready(retriever) => retriever.history(),
        }
    }

    pub fn retriever(&self) -> Option<&ConversationalRetriever> {
        match &self.state {
            SessionState::Uninitialized => None,
            SessionState::Ready(retriever) => Some(retriever),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Drops the index and history.
    pub fn reset(&mut self) {
        info!(session = %self.id, "session reset");
        self.state = SessionState::Uninitialized;
    }
}
