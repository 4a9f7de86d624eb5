//! In-memory mock retrievers and embedder for tests and demos.

use std::future::Future;
use std::time::Duration;

use crate::error::{EmbeddingCause, RankMergeError, Result, RetrievalCause};
use crate::retriever::{Embedder, Retriever};
use crate::types::{RankedHit, SearchQuery, SourceKind};

/// Mock retriever serving a fixed, pre-ranked hit list, with optional
/// artificial latency and scripted failures.
#[derive(Debug, Clone)]
pub struct MockRetriever {
    source: SourceKind,
    hits: Vec<RankedHit>,
    delay: Option<Duration>,
    failure: Option<RetrievalCause>,
}

impl MockRetriever {
    /// Create an empty mock for the given source.
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            hits: Vec::new(),
            delay: None,
            failure: None,
        }
    }

    /// Create a mock serving the given doc ids, ranked in order.
    pub fn with_hits(source: SourceKind, doc_ids: &[&str]) -> Self {
        let mut mock = Self::new(source);
        for doc_id in doc_ids {
            mock.push_hit(doc_id, None);
        }
        mock
    }

    /// Create a mock that always fails with the given cause.
    pub fn with_failure(source: SourceKind, cause: RetrievalCause) -> Self {
        let mut mock = Self::new(source);
        mock.failure = Some(cause);
        mock
    }

    /// Delay every call by `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a hit at the next rank.
    pub fn push_hit(&mut self, doc_id: &str, payload: Option<&str>) {
        let rank = self.hits.len() + 1;
        let mut hit = RankedHit::new(doc_id, rank, self.source);
        if let Some(payload) = payload {
            hit = hit.with_payload(payload);
        }
        self.hits.push(hit);
    }

    /// Append a hit verbatim, without fixing up its rank or source.
    /// Used to simulate contract-violating backends.
    pub fn push_raw_hit(&mut self, hit: RankedHit) {
        self.hits.push(hit);
    }
}

impl Retriever for MockRetriever {
    fn source(&self) -> SourceKind {
        self.source
    }

    fn retrieve(
        &self,
        _query: &SearchQuery,
        k: usize,
    ) -> impl Future<Output = Result<Vec<RankedHit>>> + Send {
        async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(cause) = self.failure.clone() {
                return Err(RankMergeError::retrieval(self.source, cause));
            }

            let mut hits = self.hits.clone();
            hits.truncate(k);
            Ok(hits)
        }
    }
}

/// Mock embedder producing a deterministic vector from the input text.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    failure: Option<EmbeddingCause>,
}

impl MockEmbedder {
    /// Create an embedder emitting vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            failure: None,
        }
    }

    /// Create an embedder that always fails with the given cause.
    pub fn failing(cause: EmbeddingCause) -> Self {
        Self {
            dimension: 0,
            failure: Some(cause),
        }
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send {
        let outcome = match self.failure {
            Some(cause) => Err(RankMergeError::Embedding(cause)),
            None => {
                // Cheap deterministic pseudo-embedding over the bytes.
                let mut vector = vec![0.0f32; self.dimension];
                if !vector.is_empty() {
                    for (i, byte) in text.bytes().enumerate() {
                        vector[i % self.dimension] += f32::from(byte) / 255.0;
                    }
                }
                Ok(vector)
            }
        };
        async move { outcome }
    }
}
