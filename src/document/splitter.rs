use crate::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::error::ConfigError;

/// Splits corpus text into overlapping windows for embedding.
///
/// Lengths are counted in `char`s. A window is cut just after the last
/// newline that lies past the overlap region, or hard-cut at `chunk_size`
/// when there is none. Each following chunk starts `chunk_overlap`
/// characters before the previous one ended, so [`TextSplitter::merge`]
/// can rebuild the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidChunking {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        if total <= self.chunk_size {
            return vec![text.to_string()];
        }

        // Byte offset of every char boundary, including the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = if total - start <= self.chunk_size {
                total
            } else {
                self.find_cut(&chars, start)
            };

            chunks.push(text[offsets[start]..offsets[end]].to_string());

            if end == total {
                break;
            }
            // end > start + overlap, so this always moves forward.
            start = end - self.chunk_overlap;
        }

        chunks
    }

    /// Rebuilds the original text from the output of [`split_text`](Self::split_text).
    pub fn merge(&self, chunks: &[String]) -> String {
        let mut text = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                text.push_str(chunk);
            } else {
                text.extend(chunk.chars().skip(self.chunk_overlap));
            }
        }
        text
    }

    fn find_cut(&self, chars: &[char], start: usize) -> usize {
        let limit = start + self.chunk_size;
        let floor = start + self.chunk_overlap;

        (floor..limit)
            .rev()
            .find(|&pos| chars[pos] == '\n')
            .map(|pos| pos + 1)
            .unwrap_or(limit)
    }
}
