use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use veritas_core::config::GenerationSettings;
use veritas_core::deadline::with_deadline;
use veritas_core::traits::Generator;

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerateOptions {
    pub num_predict: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// One non-streaming request per `generate` call, bounded by an optional
/// deadline.
pub struct OllamaGenerator {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    model: String,
    options: GenerateOptions,
    timeout: Option<Duration>,
}

impl OllamaGenerator {
    pub fn new(settings: &GenerationSettings, timeout: Option<Duration>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().context("building generator runtime")?;
        Ok(Self {
            client: reqwest::Client::new(),
            runtime,
            endpoint: format!("{}/api/generate", settings.url.trim_end_matches('/')),
            model: settings.model.clone(),
            options: GenerateOptions { num_predict: settings.max_new_tokens, temperature: settings.temperature },
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    pub fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest { model: &self.model, prompt, stream: false, options: self.options }
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(prompt))
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()?;
        let parsed: GenerateResponse = response.json().await.context("decoding generate response")?;
        Ok(parsed.response)
    }
}

impl Generator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting generation");
        self.runtime.block_on(with_deadline(self.timeout, self.request(prompt)))
    }
}
