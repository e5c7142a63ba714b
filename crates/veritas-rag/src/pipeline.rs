use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use veritas_core::chunker::{Chunker, ChunkingConfig};
use veritas_core::error::{Error, Result};
use veritas_core::traits::{DocumentSource, Embedder};
use veritas_core::types::{Chunk, DocumentChunk, QueryConfig, SearchResult};
use veritas_vector::{ScoredChunk, VectorIndex};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Load flow: source -> chunker -> embedder -> index.
/// Query flow: embedder -> index search -> ranked `SearchResult`s.
///
/// `load` takes `&mut self` and `query` takes `&self`, so a loaded pipeline
/// can be shared across threads for concurrent queries.
pub struct RetrievalPipeline {
    embedder: Box<dyn Embedder>,
    source: Box<dyn DocumentSource>,
    index: VectorIndex,
    batch_size: usize,
    show_progress: bool,
}

impl RetrievalPipeline {
    pub fn new(embedder: Box<dyn Embedder>, source: Box<dyn DocumentSource>) -> Self {
        Self { embedder, source, index: VectorIndex::new(), batch_size: DEFAULT_BATCH_SIZE, show_progress: false }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn index(&self) -> &VectorIndex { &self.index }

    pub fn is_loaded(&self) -> bool { self.index.is_loaded() }

    pub fn chunk_count(&self) -> usize { self.index.len() }

    /// Reads, chunks, embeds and indexes `document_source`.
    ///
    /// Parameters are checked before any I/O. The index only changes if
    /// every chunk was embedded; on failure it keeps its previous contents.
    pub fn load(&mut self, document_source: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<DocumentChunk>> {
        let chunker = Chunker::new(ChunkingConfig::new(chunk_size, chunk_overlap)?)?;
        let docs = self.source.read(document_source).map_err(|e| Error::SourceNotFound(format!("{e:#}")))?;
        let chunks = chunker.split_documents(&docs);
        info!(source = document_source, documents = docs.len(), chunks = chunks.len(), chunk_size, chunk_overlap, "chunked documents");

        let embeddings = self.embed_all(&chunks)?;
        let embedded: Vec<Chunk> = chunks.iter().cloned().zip(embeddings).map(|(c, e)| Chunk::new(c, e)).collect();
        self.index.add(embedded).map_err(|e| Error::Embedding(e.to_string()))?;
        info!(total = self.index.len(), dim = ?self.index.dim(), "load complete");
        Ok(chunks)
    }

    fn embed_all(&self, chunks: &[DocumentChunk]) -> Result<Vec<Vec<f32>>> {
        let pb = if self.show_progress { ProgressBar::new(chunks.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).map_err(Error::embedding)?;
            if vectors.len() != texts.len() {
                return Err(Error::Embedding(format!("expected {} vectors, embedder returned {}", texts.len(), vectors.len())));
            }
            embeddings.extend(vectors);
            pb.inc(batch.len() as u64);
        }
        pb.finish_with_message("embedded");
        Ok(embeddings)
    }

    pub fn query(&self, text: &str, config: &QueryConfig) -> Result<Vec<SearchResult>> {
        if !self.index.is_loaded() {
            return Err(Error::NotLoaded);
        }
        let query_vector = self.embedder.embed_query(text).map_err(Error::embedding)?;
        let hits = self.index.search(&query_vector, config)?;
        debug!(search_type = %config.search_type(), k = config.k(), hits = hits.len(), "query");
        if hits.is_empty() {
            warn!(query = text, "no chunks matched");
        }
        Ok(format_results(hits))
    }
}

/// Maps index hits to results with 1-based ranks, preserving order.
pub fn format_results(hits: Vec<ScoredChunk<'_>>) -> Vec<SearchResult> {
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| SearchResult {
            rank: i + 1,
            content: hit.chunk.content.clone(),
            metadata: hit.chunk.metadata.clone(),
            score: Some(hit.score),
        })
        .collect()
}
