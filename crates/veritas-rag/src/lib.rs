//! veritas-rag
//!
//! Retrieval-augmented answering over a policy corpus: `RetrievalPipeline`
//! loads and queries the vector index, `AnswerSynthesizer` turns retrieved
//! chunks into a grounded prompt, and `PolicyAnalyzer` wires both together.

pub mod analyzer;
pub mod pipeline;
pub mod synth;

pub use analyzer::PolicyAnalyzer;
pub use pipeline::{format_results, RetrievalPipeline};
pub use synth::{AnswerSynthesizer, NO_RELEVANT_INFORMATION};
