//! veritas-embed
//!
//! Embedding capability implementations: an offline feature-hashing
//! embedder and an HTTP client for an Ollama server.

use anyhow::Result;
use tracing::info;

use veritas_core::config::{EmbeddingProvider, EmbeddingSettings};
use veritas_core::traits::Embedder;

pub mod hash;
pub mod ollama;

pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;

/// Setting this to `1`/`true` forces the hash embedder regardless of config.
pub const USE_FAKE_EMBEDDINGS_VAR: &str = "VERITAS_USE_FAKE_EMBEDDINGS";

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var(USE_FAKE_EMBEDDINGS_VAR).ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake || settings.provider == EmbeddingProvider::Hash {
        info!(dim = settings.dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(settings.dim)));
    }
    info!(model = %settings.model, url = %settings.url, "using ollama embedder");
    Ok(Box::new(OllamaEmbedder::new(&settings.url, &settings.model, settings.timeout_secs.map(std::time::Duration::from_secs))?))
}
