//! Adapter contracts for the external retrieval and embedding backends.

use std::future::Future;

use ahash::AHashSet;

use crate::error::{RankMergeError, Result};
use crate::types::{RankedHit, SearchQuery, SourceKind};

/// Contract for a ranked-retrieval backend.
///
/// Implementations wrap one external engine per modality and re-express
/// its relevance ordering as 1-based contiguous ranks. A backend that
/// cannot produce a complete, ordered list must fail the call; partial
/// data is an error, not a degraded success.
pub trait Retriever: Send + Sync {
    /// Which modality this retriever serves.
    fn source(&self) -> SourceKind;

    /// Retrieve up to `k` hits for `query`, ranked 1..=k.
    fn retrieve(
        &self,
        query: &SearchQuery,
        k: usize,
    ) -> impl Future<Output = Result<Vec<RankedHit>>> + Send;
}

/// Contract for the upstream embedding provider (text to vector).
pub trait Embedder: Send + Sync {
    /// Embed query text into a vector.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;
}

/// Placeholder embedder for engines constructed without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmbedder;

impl Embedder for NullEmbedder {
    fn embed(&self, _text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send {
        async {
            Err(RankMergeError::Embedding(
                crate::error::EmbeddingCause::Unavailable,
            ))
        }
    }
}

/// Check a returned hit list against the retriever contract: length at
/// most `k`, contiguous 1-based ranks, unique document ids, and every
/// hit tagged with the expected source.
pub fn validate_hits(source: SourceKind, k: usize, hits: &[RankedHit]) -> Result<()> {
    if hits.len() > k {
        return Err(RankMergeError::malformed_response(
            source,
            format!("{} hits returned for a depth of {k}", hits.len()),
        ));
    }

    let mut seen: AHashSet<&str> = AHashSet::with_capacity(hits.len());
    for (position, hit) in hits.iter().enumerate() {
        if hit.source != source {
            return Err(RankMergeError::malformed_response(
                source,
                format!("hit '{}' is tagged {}", hit.doc_id, hit.source),
            ));
        }

        let expected_rank = position + 1;
        if hit.rank != expected_rank {
            return Err(RankMergeError::malformed_response(
                source,
                format!(
                    "rank {} at position {position}, expected {expected_rank}",
                    hit.rank
                ),
            ));
        }

        if !seen.insert(hit.doc_id.as_str()) {
            return Err(RankMergeError::malformed_response(
                source,
                format!("duplicate doc id '{}'", hit.doc_id),
            ));
        }
    }

    Ok(())
}
