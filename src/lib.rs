//! # rankmerge
//!
//! Weighted reciprocal rank fusion for hybrid search: merges a semantic
//! (vector-similarity) ranking and a lexical (full-text) ranking into
//! one unified ranking and returns the top-K fused results with timing
//! metadata.
//!
//! ## Features
//!
//! - Weighted RRF scoring over the union of per-source hit lists
//! - Concurrent fan-out/join dispatch with independent per-source
//!   deadlines
//! - Configurable degrade policy for partial source failure
//! - Deterministic ordering with explicit tie-breaking
//! - Retrieval and embedding backends behind traits, injected at
//!   construction
//!
//! ## Example
//!
//! ```
//! use rankmerge::engine::HybridSearchEngine;
//! use rankmerge::mock::MockRetriever;
//! use rankmerge::request::SearchRequest;
//! use rankmerge::types::SourceKind;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> rankmerge::error::Result<()> {
//! let engine = HybridSearchEngine::new(
//!     MockRetriever::with_hits(SourceKind::Vector, &["A", "B", "C"]),
//!     MockRetriever::with_hits(SourceKind::Text, &["B", "C", "D"]),
//! );
//!
//! let request = SearchRequest::new("rust search").with_query_vector(vec![1.0, 0.0]);
//! let response = engine.search(request).await?;
//! assert_eq!(response.top_result().unwrap().doc_id, "B");
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod mock;
pub mod request;
pub mod retriever;
pub mod types;

pub use assemble::ResultAssembler;
pub use engine::HybridSearchEngine;
pub use error::{EmbeddingCause, RankMergeError, Result, RetrievalCause, SourceFailure};
pub use fusion::RankFuser;
pub use request::SearchRequest;
pub use retriever::{Embedder, NullEmbedder, Retriever, validate_hits};
pub use types::{
    FusedResult, RankedHit, SearchQuery, SearchResponse, SearchTimeBreakdown, SourceKind,
    SourceWeights,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
