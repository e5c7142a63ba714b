//! Ollama embedding client (`POST /api/embed`).
//!
//! The `Embedder` trait is synchronous, so each client owns a small
//! current-thread runtime and blocks on the request. An optional deadline
//! bounds every call.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use veritas_core::deadline::with_deadline;
use veritas_core::traits::Embedder;

#[derive(Debug, Serialize)]
pub struct EmbedRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbedder {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str, timeout: Option<Duration>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().context("building embedder runtime")?;
        Ok(Self {
            client: reqwest::Client::new(),
            runtime,
            endpoint: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model: model.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = EmbedRequest { model: &self.model, input: texts };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()?;
        let parsed: EmbedResponse = response.json().await.context("decoding embed response")?;
        Ok(parsed.embeddings)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        debug!(model = %self.model, batch = texts.len(), "requesting embeddings");
        let embeddings = self.runtime.block_on(with_deadline(self.timeout, self.request(texts)))?;
        if embeddings.len() != texts.len() {
            return Err(anyhow!("expected {} embeddings but server returned {}", texts.len(), embeddings.len()));
        }
        Ok(embeddings)
    }
}
