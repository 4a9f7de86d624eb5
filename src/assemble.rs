//! Deterministic ordering and truncation of fused results.

use ahash::AHashMap;

use crate::types::FusedResult;

/// Turns the fused score map into the final, ordered result list.
pub struct ResultAssembler;

impl ResultAssembler {
    /// Sort fused documents by score (descending), break ties by number
    /// of contributing sources (more first) then lexicographically
    /// smallest doc id, and truncate to `k`.
    ///
    /// The ordering depends only on the fused content, never on map
    /// iteration order or on which source answered first.
    pub fn assemble(fused: AHashMap<String, FusedResult>, k: usize) -> Vec<FusedResult> {
        let mut results: Vec<FusedResult> = fused.into_values().collect();

        results.sort_unstable_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.contributing_ranks
                        .len()
                        .cmp(&a.contributing_ranks.len())
                })
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        results.truncate(k);
        results
    }
}
