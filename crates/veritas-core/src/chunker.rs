use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Error, Result};
use crate::types::{Document, DocumentChunk, Meta};

pub const DEFAULT_CHUNK_SIZE: usize = 200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// Window sizes are measured in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, chunk_overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = Self { chunk_size, chunk_overlap };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn step(&self) -> usize { self.chunk_size - self.chunk_overlap }
}

/// Splits text into fixed-size, overlapping character windows.
///
/// Every window except the last is exactly `chunk_size` chars long and
/// shares its last `chunk_overlap` chars with the next window. Splitting
/// stops at the first window that reaches the end of the text, so the
/// windows cover the text with no gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig { self.config }

    /// Char-index ranges of each window.
    pub fn windows(&self, char_len: usize) -> Vec<Range<usize>> {
        let mut windows = Vec::new();
        let mut start = 0;
        while start < char_len {
            let end = (start + self.config.chunk_size).min(char_len);
            windows.push(start..end);
            if end >= char_len { break; }
            start += self.config.step();
        }
        windows
    }

    pub fn split_document(&self, doc: &Document) -> Vec<DocumentChunk> {
        // byte offset of every char boundary, including the end of text
        let bounds: Vec<usize> = doc.text.char_indices().map(|(i, _)| i).chain(std::iter::once(doc.text.len())).collect();
        let windows = self.windows(bounds.len() - 1);
        let total_chunks = windows.len();
        windows
            .into_iter()
            .enumerate()
            .map(|(chunk_index, w)| {
                let mut metadata = Meta::new();
                metadata.insert("source".into(), doc.source.clone());
                metadata.insert("doc_id".into(), doc.doc_id.clone());
                metadata.insert("chunk_index".into(), chunk_index.to_string());
                metadata.insert("total_chunks".into(), total_chunks.to_string());
                metadata.insert("start_char".into(), w.start.to_string());
                metadata.insert("end_char".into(), w.end.to_string());
                DocumentChunk {
                    id: format!("{}:{}", doc.doc_id, chunk_index),
                    content: doc.text[bounds[w.start]..bounds[w.end]].to_string(),
                    metadata,
                }
            })
            .collect()
    }

    pub fn split_documents(&self, docs: &[Document]) -> Vec<DocumentChunk> {
        docs.iter().flat_map(|d| self.split_document(d)).collect()
    }
}

/// Splits a bare text with the given window parameters.
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<DocumentChunk>> {
    let chunker = Chunker::new(ChunkingConfig::new(chunk_size, chunk_overlap)?)?;
    let doc = Document { doc_id: "text".into(), source: "text".into(), text: text.to_string() };
    Ok(chunker.split_document(&doc))
}
