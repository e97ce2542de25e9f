pub mod api;
pub mod commands;
pub mod config;
pub mod database;
pub mod document;
pub mod error;
pub mod llm;
pub mod providers;
pub mod session;

// Re-export commonly used items
pub use config::{AppConfig, PipelineSettings};
pub use document::{Document, TextExtractor, TextSplitter};
pub use database::{SearchHit, VectorIndex};
pub use error::{AskError, ConfigError, IngestError};
pub use llm::{ConversationTurn, ConversationalRetriever};
pub use session::{IngestSummary, PipelineServices, Session};
