use crate::types::Document;

/// Maps text to fixed-length vectors. Every vector returned by one
/// implementation has the same dimensionality.
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for query"))
    }
}

/// Stateless prompt-to-text generation, one request per call.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Resolves an identifier (usually a path) to raw documents.
pub trait DocumentSource: Send + Sync {
    fn read(&self, source: &str) -> anyhow::Result<Vec<Document>>;
}
