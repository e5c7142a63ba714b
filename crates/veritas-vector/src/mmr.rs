use crate::similarity::cosine_similarity;

/// Greedy Maximal Marginal Relevance over a candidate pool.
///
/// `query_scores[i]` is the relevance of `embeddings[i]` to the query and
/// candidates are expected in descending relevance order. Each step picks the
/// unselected candidate maximising
/// `lambda_mult * relevance - (1 - lambda_mult) * max_sim_to_selected`;
/// the first pick has nothing to be redundant with, so it is the most
/// relevant one. Ties keep the earlier candidate.
///
/// Returns positions into the pool, in selection order, at most `k` long.
pub fn maximal_marginal_relevance(query_scores: &[f32], embeddings: &[&[f32]], k: usize, lambda_mult: f32) -> Vec<usize> {
    let n = embeddings.len().min(query_scores.len());
    let k = k.min(n);
    let mut selected = Vec::with_capacity(k);
    let mut picked = vec![false; n];
    // running max similarity of each candidate to anything already selected
    let mut redundancy = vec![f32::NEG_INFINITY; n];

    while selected.len() < k {
        let mut best: Option<(usize, f32)> = None;
        for i in (0..n).filter(|&i| !picked[i]) {
            let penalty = if selected.is_empty() { 0.0 } else { redundancy[i] };
            let score = lambda_mult * query_scores[i] - (1.0 - lambda_mult) * penalty;
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        let Some((chosen, _)) = best else { break };
        picked[chosen] = true;
        selected.push(chosen);
        for i in (0..n).filter(|&i| !picked[i]) {
            redundancy[i] = redundancy[i].max(cosine_similarity(embeddings[i], embeddings[chosen]));
        }
    }
    selected
}
