//! veritas-llm
//!
//! Generation capability: a blocking client for Ollama's `/api/generate`.

use anyhow::Result;
use std::time::Duration;
use tracing::info;

use veritas_core::config::{GenerationProvider, GenerationSettings};
use veritas_core::traits::Generator;

pub mod ollama;

pub use ollama::OllamaGenerator;

pub fn get_default_generator(settings: &GenerationSettings) -> Result<Box<dyn Generator>> {
    match settings.provider {
        GenerationProvider::Ollama => {
            info!(model = %settings.model, url = %settings.url, "using ollama generator");
            Ok(Box::new(OllamaGenerator::new(settings, settings.timeout_secs.map(Duration::from_secs))?))
        }
    }
}
