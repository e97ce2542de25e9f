use crate::config::PipelineSettings;
use crate::database::{SearchHit, VectorIndex};
use crate::error::AskError;
use crate::llm::embeddings::EmbeddingGenerator;
use crate::llm::memory::{ConversationMemory, ConversationTurn};
use crate::providers::traits::{CompletionProvider, EmbeddingProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Answers questions over one ingested document set, keeping the running
/// chat history.
pub struct ConversationalRetriever {
    index: VectorIndex,
    embeddings: EmbeddingGenerator,
    provider: Arc<dyn CompletionProvider>,
    memory: ConversationMemory,
    top_k: usize,
    condense_question: bool,
}

impl ConversationalRetriever {
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        provider: Arc<dyn CompletionProvider>,
        settings: &PipelineSettings,
    ) -> Self {
        let embeddings = EmbeddingGenerator::new(embedder, index.dimensions());
        Self {
            index,
            embeddings,
            provider,
            memory: ConversationMemory::new(),
            top_k: settings.top_k.max(1),
            condense_question: settings.condense_question,
        }
    }

    /// Retrieves context for `question`, asks the completion service with the
    /// prior turns as history and records the new turn. Nothing is recorded
    /// on failure.
    pub async fn ask(&mut self, question: &str) -> Result<String, AskError> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Err(AskError::EmptyQuestion);
        }

        // A condensed question replaces the follow-up for retrieval and answering.
        let standalone = if self.condense_question && !self.memory.is_empty() {
            self.condense(trimmed).await?
        } else {
            trimmed.to_string()
        };

        let hits = self.retrieve(&standalone).await?;
        debug!(hits = hits.len(), query = %standalone, "retrieved context");

        let prompt = build_answer_prompt(&hits, &standalone);
        let answer = self
            .provider
            .complete(&prompt, self.memory.turns())
            .await
            .map_err(|e| AskError::CompletionService(e.to_string()))?;

        self.memory.record(ConversationTurn::new(question, answer.clone()));
        info!(turns = self.memory.len(), "question answered");
        Ok(answer)
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>, AskError> {
        let embedding = self.embeddings.generate_embedding(query).await?;
        Ok(self.index.search(&embedding, self.top_k))
    }

    async fn condense(&self, question: &str) -> Result<String, AskError> {
        let prompt = build_condense_prompt(&self.memory.transcript(), question);
        let standalone = self
            .provider
            .complete(&prompt, &[])
            .await
            .map_err(|e| AskError::CompletionService(e.to_string()))?;

        let standalone = standalone.trim();
        if standalone.is_empty() {
            Ok(question.to_string())
        } else {
            Ok(standalone.to_string())
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.memory.turns()
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

pub fn build_answer_prompt(hits: &[SearchHit], question: &str) -> String {
    let context = hits
        .iter()
        .map(|hit| hit.chunk.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {}\n\nQuestion: {}\nHelpful Answer:",
        context, question
    )
}

pub fn build_condense_prompt(transcript: &str, question: &str) -> String {
    format!(
        "Given the following conversation and a follow up question, rephrase the follow up \
         question to be a standalone question, in its original language.\n\n\
         Chat History:\n{}\nFollow Up Input: {}\nStandalone question:",
        transcript, question
    )
}
