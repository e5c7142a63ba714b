use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Index not loaded: load documents before querying")]
    NotLoaded,

    #[error("Unsupported search type: {0}")]
    UnsupportedSearchType(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Wraps a capability failure, keeping the full `anyhow` context chain.
    pub fn embedding(err: anyhow::Error) -> Self { Self::Embedding(format!("{err:#}")) }

    pub fn generation(err: anyhow::Error) -> Self { Self::Generation(format!("{err:#}")) }
}

pub type Result<T> = std::result::Result<T, Error>;
