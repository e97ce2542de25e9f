use thiserror::Error;

/// Failures while turning uploaded PDFs into a searchable index.
///
/// Any of these leaves the session's current index untouched.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unreadable document '{name}': {reason}")]
    UnreadableDocument { name: String, reason: String },

    #[error("No extractable text found in the uploaded documents")]
    EmptyCorpus,

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),
}

/// Failures while answering a question.
///
/// No conversation turn is recorded when one of these is returned.
#[derive(Error, Debug)]
pub enum AskError {
    #[error("No documents have been ingested yet")]
    NoIndexLoaded,

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Completion service error: {0}")]
    CompletionService(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid chunk geometry: size {size}, overlap {overlap}")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("Missing configuration value: {0}")]
    Missing(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
