//! Types and data structures for hybrid rank fusion.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which retrieval modality produced a hit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Semantic (vector-similarity) retrieval.
    Vector,
    /// Lexical (full-text) retrieval.
    Text,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Vector => write!(f, "vector"),
            SourceKind::Text => write!(f, "text"),
        }
    }
}

/// One result from a single retrieval source.
///
/// Ranks are 1-based and contiguous within a source's hit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    /// Document ID, unique within its source list.
    pub doc_id: String,

    /// 1-based rank assigned by the backend.
    pub rank: usize,

    /// Source that produced this hit.
    pub source: SourceKind,

    /// Opaque document text or metadata, if the backend returned any.
    pub payload: Option<String>,
}

impl RankedHit {
    /// Create a new ranked hit without payload.
    pub fn new(doc_id: impl Into<String>, rank: usize, source: SourceKind) -> Self {
        Self {
            doc_id: doc_id.into(),
            rank,
            source,
            payload: None,
        }
    }

    /// Attach a document payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Per-source fusion weights. Each weight scales that source's
/// reciprocal-rank terms and must be finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    /// Weight applied to vector-search terms.
    pub vector: f64,
    /// Weight applied to text-search terms.
    pub text: f64,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self {
            vector: 1.0,
            text: 1.0,
        }
    }
}

impl SourceWeights {
    /// Look up the weight for a source.
    pub fn get(&self, source: SourceKind) -> f64 {
        match source {
            SourceKind::Vector => self.vector,
            SourceKind::Text => self.text,
        }
    }
}

/// Query payload handed to retrievers: the raw text plus the query
/// vector when one is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text for lexical retrieval.
    pub text: String,

    /// Query vector for semantic retrieval (if available).
    pub vector: Option<Vec<f32>>,
}

/// One document after fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    /// Document ID.
    pub doc_id: String,

    /// Opaque document payload carried over from the source hits.
    pub payload: Option<String>,

    /// Combined reciprocal-rank score.
    pub fused_score: f64,

    /// Which sources contributed, and at what rank.
    pub contributing_ranks: BTreeMap<SourceKind, usize>,
}

/// Breakdown of where a search call spent its time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTimeBreakdown {
    /// Time spent on vector retrieval.
    pub vector_ms: f64,

    /// Time spent on text retrieval.
    pub text_ms: f64,

    /// Time spent fusing and assembling results.
    pub fuse_ms: f64,
}

/// Outcome of one hybrid search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Fused results, sorted by score (descending), at most `k` entries.
    pub results: Vec<FusedResult>,

    /// Wall-clock time for the whole call.
    pub elapsed: Duration,

    /// True when a source failed and fusion proceeded single-source.
    pub degraded: bool,

    /// Breakdown of retrieval and fusion times.
    pub time_breakdown: SearchTimeBreakdown,

    /// Messages for source failures absorbed by the degrade policy.
    pub source_errors: Vec<String>,
}

impl SearchResponse {
    /// Get the number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the response carries no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Get the top-ranked result.
    pub fn top_result(&self) -> Option<&FusedResult> {
        self.results.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Vector.to_string(), "vector");
        assert_eq!(SourceKind::Text.to_string(), "text");
    }

    #[test]
    fn test_ranked_hit_builder() {
        let hit = RankedHit::new("doc-1", 3, SourceKind::Text).with_payload("body text");
        assert_eq!(hit.doc_id, "doc-1");
        assert_eq!(hit.rank, 3);
        assert_eq!(hit.source, SourceKind::Text);
        assert_eq!(hit.payload.as_deref(), Some("body text"));
    }

    #[test]
    fn test_source_weights_default_and_lookup() {
        let weights = SourceWeights::default();
        assert_eq!(weights.get(SourceKind::Vector), 1.0);
        assert_eq!(weights.get(SourceKind::Text), 1.0);

        let weights = SourceWeights {
            vector: 0.7,
            text: 0.3,
        };
        assert_eq!(weights.get(SourceKind::Vector), 0.7);
        assert_eq!(weights.get(SourceKind::Text), 0.3);
    }

    #[test]
    fn test_search_response_accessors() {
        let response = SearchResponse {
            results: vec![FusedResult {
                doc_id: "a".to_string(),
                payload: None,
                fused_score: 0.5,
                contributing_ranks: BTreeMap::new(),
            }],
            elapsed: Duration::from_millis(12),
            degraded: false,
            time_breakdown: SearchTimeBreakdown::default(),
            source_errors: Vec::new(),
        };

        assert_eq!(response.len(), 1);
        assert!(!response.is_empty());
        assert_eq!(response.top_result().unwrap().doc_id, "a");
    }

    #[test]
    fn test_source_kind_serde_round_trip() {
        let json = serde_json::to_string(&SourceKind::Vector).unwrap();
        assert_eq!(json, "\"vector\"");
        let back: SourceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SourceKind::Vector);
    }
}
