use crate::error::IngestError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// One uploaded PDF, held only until its text has been extracted.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub async fn from_path(path: &Path) -> Result<Self, IngestError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| IngestError::UnreadableDocument {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Pulls plain text out of PDFs.
///
/// Pages are read one by one with `lopdf`. If a loaded document has a page
/// whose text cannot be decoded, the whole document is retried with
/// `pdf-extract`, which handles more font encodings but loses page
/// boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Concatenates the text of every page of every document, in order, with
    /// no separators. The first unreadable document aborts the batch.
    pub fn extract(&self, documents: &[Document]) -> Result<String, IngestError> {
        let mut text = String::new();
        for document in documents {
            for page in self.extract_pages(document)? {
                text.push_str(&page);
            }
        }
        Ok(text)
    }

    pub fn extract_pages(&self, document: &Document) -> Result<Vec<String>, IngestError> {
        let unreadable = |reason: String| IngestError::UnreadableDocument {
            name: document.name.clone(),
            reason,
        };

        let pdf = lopdf::Document::load_mem(&document.bytes)
            .map_err(|e| unreadable(format!("not a valid PDF: {}", e)))?;

        let pages = pdf.get_pages();
        debug!(document = %document.name, page_count = pages.len(), "extracting pages");

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match pdf.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    warn!(
                        document = %document.name,
                        page = page_number,
                        error = %e,
                        "page text could not be decoded, retrying with pdf-extract"
                    );
                    return extract_whole_document(&document.bytes)
                        .map(|text| vec![text])
                        .map_err(unreadable);
                }
            }
        }

        Ok(texts)
    }
}

fn extract_whole_document(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed font programs.
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("text could not be decoded: {}", e)),
        Err(_) => Err("text could not be decoded: extractor panicked".to_string()),
    }
}
