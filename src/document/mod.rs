mod extractor;
mod splitter;

pub use extractor::{Document, TextExtractor};
pub use splitter::TextSplitter;
