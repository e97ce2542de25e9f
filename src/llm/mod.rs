pub mod chat;
pub mod embeddings;
pub mod memory;

pub use chat::ConversationalRetriever;
pub use embeddings::EmbeddingGenerator;
pub use memory::{ConversationMemory, ConversationTurn};
