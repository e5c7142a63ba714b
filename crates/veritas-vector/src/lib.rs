//! veritas-vector
//!
//! In-memory vector index over embedded chunks. Scores are cosine
//! similarities; retrieval is either plain top-k similarity (with an
//! optional score floor) or Maximal Marginal Relevance. See `index` for the
//! query surface and `mmr` for the greedy selection.

pub mod index;
pub mod mmr;
pub mod similarity;

pub use index::{ScoredChunk, VectorIndex};
pub use similarity::cosine_similarity;
