use tracing::{debug, info};

use veritas_core::error::{Error, Result};
use veritas_core::types::{validate_mmr, validate_similarity, Chunk, QueryConfig, SearchStrategy};

use crate::mmr::maximal_marginal_relevance;
use crate::similarity::cosine_similarity;

/// A stored chunk paired with its cosine similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

/// Append-only store of embedded chunks.
///
/// Queries take `&self` and never mutate, so one loaded index can serve
/// many threads; `add` needs exclusive access.
#[derive(Debug, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    dim: Option<usize>,
    loaded: bool,
}

impl VectorIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    /// True once any `add` has succeeded, even an empty one.
    pub fn is_loaded(&self) -> bool { self.loaded }

    /// Dimensionality fixed by the first non-empty `add`.
    pub fn dim(&self) -> Option<usize> { self.dim }

    /// Appends chunks in order. Either every chunk is added or, on a
    /// dimensionality mismatch, none is.
    pub fn add(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        let mut dim = self.dim;
        for chunk in &chunks {
            let len = chunk.embedding.len();
            if len == 0 {
                return Err(Error::InvalidParameter(format!("chunk '{}' has an empty embedding", chunk.id)));
            }
            match dim {
                Some(d) if d != len => {
                    return Err(Error::InvalidParameter(format!(
                        "chunk '{}' has embedding dimension {len}, index expects {d}",
                        chunk.id
                    )));
                }
                Some(_) => {}
                None => dim = Some(len),
            }
        }
        info!(added = chunks.len(), total = self.chunks.len() + chunks.len(), "indexed chunks");
        self.dim = dim;
        self.chunks.extend(chunks);
        self.loaded = true;
        Ok(())
    }

    /// Single entry point dispatching on the query's strategy.
    pub fn search(&self, query_vector: &[f32], config: &QueryConfig) -> Result<Vec<ScoredChunk<'_>>> {
        match config.strategy() {
            SearchStrategy::Similarity { score_threshold } => self.similarity_search(query_vector, config.k(), score_threshold),
            SearchStrategy::Mmr { fetch_k, lambda_mult } => self.mmr_search(query_vector, config.k(), fetch_k, lambda_mult),
        }
    }

    /// Top `k` chunks by descending cosine similarity, dropping any that
    /// score below `score_threshold`. Equal scores keep insertion order.
    pub fn similarity_search(&self, query_vector: &[f32], k: usize, score_threshold: Option<f32>) -> Result<Vec<ScoredChunk<'_>>> {
        self.ensure_queryable(query_vector)?;
        validate_similarity(k, score_threshold)?;
        let mut hits = self.ranked(query_vector);
        if let Some(threshold) = score_threshold {
            hits.retain(|h| h.score >= threshold);
        }
        hits.truncate(k);
        debug!(k, ?score_threshold, hits = hits.len(), "similarity search");
        Ok(hits)
    }

    /// Maximal Marginal Relevance over the `fetch_k` most similar chunks.
    /// Results come back in selection order; `score` is still the
    /// chunk's similarity to the query.
    pub fn mmr_search(&self, query_vector: &[f32], k: usize, fetch_k: usize, lambda_mult: f32) -> Result<Vec<ScoredChunk<'_>>> {
        self.ensure_queryable(query_vector)?;
        validate_mmr(k, fetch_k, lambda_mult)?;
        let mut candidates = self.ranked(query_vector);
        candidates.truncate(fetch_k);
        let scores: Vec<f32> = candidates.iter().map(|c| c.score).collect();
        let embeddings: Vec<&[f32]> = candidates.iter().map(|c| c.chunk.embedding.as_slice()).collect();
        let picks = maximal_marginal_relevance(&scores, &embeddings, k, lambda_mult);
        debug!(k, fetch_k, lambda_mult, pool = candidates.len(), picks = picks.len(), "mmr search");
        Ok(picks.into_iter().map(|i| candidates[i]).collect())
    }

    fn ensure_queryable(&self, query_vector: &[f32]) -> Result<()> {
        if !self.loaded {
            return Err(Error::NotLoaded);
        }
        if let Some(d) = self.dim {
            if query_vector.len() != d {
                return Err(Error::InvalidParameter(format!("query vector has dimension {}, index expects {d}", query_vector.len())));
            }
        }
        Ok(())
    }

    /// Every chunk scored against the query, best first. `sort_by` is
    /// stable, so ties stay in insertion order.
    fn ranked(&self, query_vector: &[f32]) -> Vec<ScoredChunk<'_>> {
        let mut hits: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk { chunk, score: cosine_similarity(query_vector, &chunk.embedding) })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }
}
