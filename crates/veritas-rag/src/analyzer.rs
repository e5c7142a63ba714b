use tracing::info;

use veritas_core::chunker::ChunkingConfig;
use veritas_core::config::{RetrievalSettings, Settings};
use veritas_core::error::Result;
use veritas_core::traits::{DocumentSource, Embedder, Generator};
use veritas_core::types::{Answer, DocumentChunk, QueryConfig, SearchResult, SearchType};

use crate::pipeline::RetrievalPipeline;
use crate::synth::AnswerSynthesizer;

/// Policy question answering: retrieval plus grounded generation, with the
/// configured chunking and retrieval defaults.
pub struct PolicyAnalyzer {
    pipeline: RetrievalPipeline,
    synthesizer: AnswerSynthesizer,
    chunking: ChunkingConfig,
    retrieval: RetrievalSettings,
}

impl PolicyAnalyzer {
    pub fn from_settings(settings: &Settings, embedder: Box<dyn Embedder>, generator: Box<dyn Generator>, source: Box<dyn DocumentSource>) -> Self {
        let pipeline = RetrievalPipeline::new(embedder, source)
            .with_batch_size(settings.embedding.batch_size)
            .with_progress(settings.embedding.progress);
        Self { pipeline, synthesizer: AnswerSynthesizer::new(generator), chunking: settings.chunking, retrieval: settings.retrieval }
    }

    pub fn pipeline(&self) -> &RetrievalPipeline { &self.pipeline }

    pub fn load_policies(&mut self, source: &str) -> Result<Vec<DocumentChunk>> {
        let chunks = self.pipeline.load(source, self.chunking.chunk_size, self.chunking.chunk_overlap)?;
        info!(source, chunks = chunks.len(), "policies loaded");
        Ok(chunks)
    }

    /// Query settings from configuration, used until the caller picks others.
    pub fn default_query_config(&self) -> Result<QueryConfig> { self.retrieval.query_config() }

    /// Builds a query config for `search_type` with `k` results, taking the
    /// remaining parameters from configuration.
    pub fn query_config(&self, search_type: SearchType, k: usize, score_threshold: Option<f32>) -> Result<QueryConfig> {
        self.retrieval.query_config_for(search_type, k, score_threshold)
    }

    pub fn ask(&self, query: &str, config: &QueryConfig) -> Result<Answer> {
        let results = self.pipeline.query(query, config)?;
        self.synthesizer.answer(query, results, config)
    }

    /// Retrieval only, without generation.
    pub fn retrieve(&self, query: &str, config: &QueryConfig) -> Result<Vec<SearchResult>> { self.pipeline.query(query, config) }

    /// Retrieval with the search type given by name, e.g. from user input.
    pub fn retrieve_named(&self, query: &str, search_type: &str, k: usize) -> Result<Vec<SearchResult>> {
        let config = self.query_config(search_type.parse()?, k, None)?;
        self.retrieve(query, &config)
    }

    pub fn available_search_types(&self) -> &'static [SearchType] { &SearchType::ALL }
}
