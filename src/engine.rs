//! Hybrid search orchestration: concurrent fan-out to both retrieval
//! sources, per-source deadlines, degrade policy, fusion, assembly.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::assemble::ResultAssembler;
use crate::error::{RankMergeError, Result, RetrievalCause};
use crate::fusion::RankFuser;
use crate::request::SearchRequest;
use crate::retriever::{Embedder, NullEmbedder, Retriever, validate_hits};
use crate::types::{
    RankedHit, SearchQuery, SearchResponse, SearchTimeBreakdown, SourceKind,
};

// Fetch deeper than k from each source so fusion has candidates to
// promote past single-source ranks.
const CANDIDATE_FACTOR: usize = 2;

/// Orchestrates one hybrid search call over two injected retrievers and
/// an optional embedder.
///
/// Both retrievals run concurrently and join at a single point; wall
/// clock arrival order never influences the fused ranking, only the
/// degrade decision. Dropping the future returned by [`search`] cancels
/// both in-flight retrievals — no detached tasks are spawned.
///
/// The engine holds no mutable state, so concurrent calls for different
/// requests are fully independent.
///
/// [`search`]: HybridSearchEngine::search
pub struct HybridSearchEngine<V, T, E = NullEmbedder> {
    vector: V,
    text: T,
    embedder: Option<E>,
}

impl<V, T> HybridSearchEngine<V, T>
where
    V: Retriever,
    T: Retriever,
{
    /// Create an engine from its two retriever dependencies. Requests
    /// must then carry a precomputed `query_vector`, or the vector
    /// source is treated as failed.
    pub fn new(vector: V, text: T) -> Self {
        Self {
            vector,
            text,
            embedder: None,
        }
    }
}

impl<V, T, E> HybridSearchEngine<V, T, E>
where
    V: Retriever,
    T: Retriever,
    E: Embedder,
{
    /// Create an engine that derives missing query vectors through the
    /// given embedding provider.
    pub fn with_embedder(vector: V, text: T, embedder: E) -> Self {
        Self {
            vector,
            text,
            embedder: Some(embedder),
        }
    }

    /// Execute one hybrid search call.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        request.validate()?;

        let start = Instant::now();
        let depth = request.k.saturating_mul(CANDIDATE_FACTOR);
        debug!(k = request.k, depth, "dispatching hybrid retrieval");

        // Resolve the query vector before fan-out; an embedding failure
        // is equivalent to a failed vector dispatch (never attempted).
        let mut vector_failure: Option<RankMergeError> = None;
        let query_vector = match request.query_vector.clone() {
            Some(vector) => Some(vector),
            None => match &self.embedder {
                Some(embedder) => match embedder.embed(&request.query_text).await {
                    Ok(vector) => Some(vector),
                    Err(err) => {
                        vector_failure = Some(err);
                        None
                    }
                },
                None => {
                    vector_failure = Some(RankMergeError::retrieval(
                        SourceKind::Vector,
                        RetrievalCause::MalformedQuery,
                    ));
                    None
                }
            },
        };

        let query = SearchQuery {
            text: request.query_text.clone(),
            vector: query_vector,
        };

        let vector_call = async {
            match vector_failure {
                Some(err) => (Err(err), 0.0),
                None => {
                    run_source(&self.vector, &query, depth, request.source_timeout).await
                }
            }
        };
        let text_call = run_source(&self.text, &query, depth, request.source_timeout);

        let ((vector_outcome, vector_ms), (text_outcome, text_ms)) =
            tokio::join!(vector_call, text_call);

        let mut lists: Vec<(SourceKind, Vec<RankedHit>)> = Vec::with_capacity(2);
        let mut failures: Vec<(SourceKind, RankMergeError)> = Vec::new();
        for (source, outcome) in [
            (SourceKind::Vector, vector_outcome),
            (SourceKind::Text, text_outcome),
        ] {
            match outcome {
                Ok(hits) => lists.push((source, hits)),
                Err(err) => failures.push((source, err)),
            }
        }

        if lists.is_empty() {
            return Err(RankMergeError::all_sources_failed(failures));
        }
        if let Some((_, err)) = failures.first() {
            if !request.degrade_on_partial_failure {
                return Err(err.clone());
            }
        }

        let degraded = !failures.is_empty();
        let source_errors: Vec<String> = failures
            .iter()
            .map(|(_, err)| {
                warn!(error = %err, "retrieval source failed; continuing degraded");
                err.to_string()
            })
            .collect();

        let fuse_start = Instant::now();
        let fuser = RankFuser::new(request.weights, request.rank_constant);
        let borrowed: Vec<(SourceKind, &[RankedHit])> = lists
            .iter()
            .map(|(source, hits)| (*source, hits.as_slice()))
            .collect();
        let fused = fuser.fuse(&borrowed);
        let results = ResultAssembler::assemble(fused, request.k);
        let fuse_ms = millis_since(fuse_start);

        debug!(
            results = results.len(),
            degraded,
            "hybrid retrieval complete"
        );

        Ok(SearchResponse {
            results,
            elapsed: start.elapsed(),
            degraded,
            time_breakdown: SearchTimeBreakdown {
                vector_ms,
                text_ms,
                fuse_ms,
            },
            source_errors,
        })
    }
}

/// Run one retrieval call under its deadline and validate the returned
/// hit list. Returns the outcome and the time the call took.
async fn run_source<R: Retriever>(
    retriever: &R,
    query: &SearchQuery,
    depth: usize,
    deadline: Duration,
) -> (Result<Vec<RankedHit>>, f64) {
    let source = retriever.source();
    let start = Instant::now();

    let outcome = match tokio::time::timeout(deadline, retriever.retrieve(query, depth)).await
    {
        Ok(Ok(hits)) => validate_hits(source, depth, &hits).map(|()| hits),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(RankMergeError::timeout(source)),
    };

    (outcome, millis_since(start))
}

fn millis_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
