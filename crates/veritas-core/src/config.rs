//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `VERITAS_*` env vars (nested keys split on `__`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{QueryConfig, SearchType, DEFAULT_FETCH_K, DEFAULT_K, DEFAULT_LAMBDA_MULT};

pub const ENV_PREFIX: &str = "VERITAS_";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name, Path::new("."))
    }

    /// Loads `config.toml` and `config.<env>.toml` from `dir`.
    pub fn load_for_env(env_name: &str, dir: &Path) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        match env {
            "prod" | "production" => {
                let settings = self.settings()?;
                if settings.embedding.provider == EmbeddingProvider::Hash {
                    tracing::warn!("hash embeddings configured in production; retrieval quality will be lexical only");
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.retrieval.query_config().map_err(|e| match e {
            Error::InvalidParameter(msg) => Error::Config(format!("retrieval: {msg}")),
            other => other,
        })?;
        if self.embedding.batch_size == 0 {
            return Err(Error::Config("embedding.batch_size must be greater than 0".into()));
        }
        if self.embedding.dim == 0 {
            return Err(Error::Config("embedding.dim must be greater than 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub policy_file: String,
}

impl Default for DataSettings {
    fn default() -> Self { Self { policy_file: "../data/companypolicies.txt".into() } }
}

/// Defaults used for questions until the user changes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub search_type: SearchType,
    pub k: usize,
    pub score_threshold: Option<f32>,
    pub fetch_k: usize,
    pub lambda_mult: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { search_type: SearchType::Similarity, k: DEFAULT_K, score_threshold: None, fetch_k: DEFAULT_FETCH_K, lambda_mult: DEFAULT_LAMBDA_MULT }
    }
}

impl RetrievalSettings {
    pub fn query_config(&self) -> Result<QueryConfig> { self.query_config_for(self.search_type, self.k, self.score_threshold) }

    /// Query config for a caller-chosen mode and `k`, with the remaining
    /// parameters from these settings. The MMR candidate pool widens to at
    /// least `k`, so any positive `k` is accepted.
    pub fn query_config_for(&self, search_type: SearchType, k: usize, score_threshold: Option<f32>) -> Result<QueryConfig> {
        QueryConfig::from_parts(search_type, k, score_threshold, self.fetch_k.max(k), self.lambda_mult)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Offline feature-hashing embedder.
    Hash,
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub url: String,
    /// Output dimensionality of the hash embedder.
    pub dim: usize,
    pub batch_size: usize,
    pub timeout_secs: Option<u64>,
    pub progress: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Hash,
            model: "nomic-embed-text".into(),
            url: "http://localhost:11434".into(),
            dim: 1024,
            batch_size: 32,
            timeout_secs: Some(30),
            progress: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub provider: GenerationProvider,
    pub model: String,
    pub url: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::Ollama,
            model: "mistral-small".into(),
            url: "http://localhost:11434".into(),
            max_new_tokens: 256,
            temperature: 0.5,
            timeout_secs: Some(120),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
