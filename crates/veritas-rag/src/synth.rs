use tracing::debug;

use veritas_core::error::{Error, Result};
use veritas_core::traits::Generator;
use veritas_core::types::{Answer, QueryConfig, SearchResult};

/// Returned as-is when retrieval finds nothing; the generator is not called.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant policy information found for your query.";

pub struct AnswerSynthesizer {
    generator: Box<dyn Generator>,
}

impl AnswerSynthesizer {
    pub fn new(generator: Box<dyn Generator>) -> Self { Self { generator } }

    /// Joins result contents in rank order, separated by a blank line, into
    /// a prompt that restricts the answer to that context.
    pub fn build_prompt(query: &str, results: &[SearchResult]) -> String {
        let mut ordered: Vec<&SearchResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.rank);
        let context = ordered.iter().map(|r| r.content.as_str()).collect::<Vec<_>>().join("\n\n");
        format!(
            "Based on the following company policies, please answer the user's question.\n\
             \n\
             Company Policies:\n\
             {context}\n\
             \n\
             Question: {query}\n\
             \n\
             Please provide a clear, concise answer based only on the policies above. \
             If the information isn't available in the policies, state that clearly.\n\
             \n\
             Answer:"
        )
    }

    pub fn answer(&self, query: &str, results: Vec<SearchResult>, config: &QueryConfig) -> Result<Answer> {
        let answer = if results.is_empty() {
            NO_RELEVANT_INFORMATION.to_string()
        } else {
            let prompt = Self::build_prompt(query, &results);
            debug!(sources = results.len(), prompt_chars = prompt.len(), "generating answer");
            self.generator.generate(&prompt).map_err(Error::generation)?.trim().to_string()
        };
        Ok(Answer { answer, search_type: config.search_type(), parameters: config.parameters(), sources: results })
    }
}
