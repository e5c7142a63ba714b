//! Domain types shared by the chunker, the vector index and the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// Raw text plus the identifier it was read from. Only lives during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doc_id: String,
    pub source: String,
    pub text: String,
}

/// A contiguous slice of a document, produced by the chunker.
///
/// - `id`: `<doc_id>:<chunk_index>`
/// - `metadata`: `source`, `doc_id`, `chunk_index`, `total_chunks`,
///   `start_char`, `end_char`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Meta,
}

/// An embedded chunk as stored by the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Meta,
    pub embedding: Vec<f32>,
}

impl Chunk {
    pub fn new(chunk: DocumentChunk, embedding: Vec<f32>) -> Self {
        Self { id: chunk.id, content: chunk.content, metadata: chunk.metadata, embedding }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Similarity,
    Mmr,
}

impl SearchType {
    pub const ALL: [SearchType; 2] = [SearchType::Similarity, SearchType::Mmr];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Similarity => "similarity",
            SearchType::Mmr => "mmr",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SearchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "similarity" => Ok(SearchType::Similarity),
            "mmr" => Ok(SearchType::Mmr),
            other => Err(Error::UnsupportedSearchType(other.to_string())),
        }
    }
}

/// Mode-specific search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "search_type", rename_all = "lowercase")]
pub enum SearchStrategy {
    Similarity { score_threshold: Option<f32> },
    Mmr { fetch_k: usize, lambda_mult: f32 },
}

/// Validated, immutable per-query settings. Only the constructors build
/// one, so there is no `Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryConfig {
    k: usize,
    strategy: SearchStrategy,
}

pub const DEFAULT_K: usize = 4;
pub const DEFAULT_FETCH_K: usize = 20;
pub const DEFAULT_LAMBDA_MULT: f32 = 0.5;

impl QueryConfig {
    pub fn similarity(k: usize, score_threshold: Option<f32>) -> Result<Self> {
        validate_similarity(k, score_threshold)?;
        Ok(Self { k, strategy: SearchStrategy::Similarity { score_threshold } })
    }

    pub fn mmr(k: usize, fetch_k: usize, lambda_mult: f32) -> Result<Self> {
        validate_mmr(k, fetch_k, lambda_mult)?;
        Ok(Self { k, strategy: SearchStrategy::Mmr { fetch_k, lambda_mult } })
    }

    /// Builds the variant matching `search_type`; parameters that do not
    /// apply to that mode are ignored.
    pub fn from_parts(search_type: SearchType, k: usize, score_threshold: Option<f32>, fetch_k: usize, lambda_mult: f32) -> Result<Self> {
        match search_type {
            SearchType::Similarity => Self::similarity(k, score_threshold),
            SearchType::Mmr => Self::mmr(k, fetch_k, lambda_mult),
        }
    }

    pub fn k(&self) -> usize { self.k }

    pub fn strategy(&self) -> SearchStrategy { self.strategy }

    pub fn search_type(&self) -> SearchType {
        match self.strategy {
            SearchStrategy::Similarity { .. } => SearchType::Similarity,
            SearchStrategy::Mmr { .. } => SearchType::Mmr,
        }
    }

    pub fn parameters(&self) -> QueryParameters {
        match self.strategy {
            SearchStrategy::Similarity { score_threshold } => QueryParameters { k: self.k, score_threshold, fetch_k: None, lambda_mult: None },
            SearchStrategy::Mmr { fetch_k, lambda_mult } => QueryParameters { k: self.k, score_threshold: None, fetch_k: Some(fetch_k), lambda_mult: Some(lambda_mult) },
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { k: DEFAULT_K, strategy: SearchStrategy::Similarity { score_threshold: None } }
    }
}

pub fn validate_similarity(k: usize, score_threshold: Option<f32>) -> Result<()> {
    if k == 0 { return Err(Error::InvalidParameter("k must be greater than 0".into())); }
    if let Some(t) = score_threshold {
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidParameter(format!("score_threshold must be within [0, 1], got {t}")));
        }
    }
    Ok(())
}

pub fn validate_mmr(k: usize, fetch_k: usize, lambda_mult: f32) -> Result<()> {
    if k == 0 { return Err(Error::InvalidParameter("k must be greater than 0".into())); }
    if fetch_k < k {
        return Err(Error::InvalidParameter(format!("fetch_k ({fetch_k}) must be at least k ({k})")));
    }
    if !(0.0..=1.0).contains(&lambda_mult) {
        return Err(Error::InvalidParameter(format!("lambda_mult must be within [0, 1], got {lambda_mult}")));
    }
    Ok(())
}

/// One ranked retrieval result. `score` of `None` means unknown, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub rank: usize,
    pub content: String,
    pub metadata: Meta,
    pub score: Option<f32>,
}

/// Flattened view of the query parameters, reported alongside answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub k: usize,
    pub score_threshold: Option<f32>,
    pub fetch_k: Option<usize>,
    pub lambda_mult: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub search_type: SearchType,
    pub parameters: QueryParameters,
    pub sources: Vec<SearchResult>,
}
