//! Error types for rankmerge operations.
//!
//! All fallible operations return [`Result`], with [`RankMergeError`]
//! covering configuration rejection, per-source retrieval failures,
//! embedding failures propagated from the upstream provider, and the
//! aggregated total-failure case. Fusion and assembly never error.

use thiserror::Error;

use crate::types::SourceKind;

/// Why a single retrieval source failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalCause {
    /// The source did not answer within its deadline.
    #[error("deadline exceeded")]
    Timeout,

    /// The backend was unreachable or rejected the connection.
    #[error("backend unavailable")]
    Unavailable,

    /// The query did not carry the payload this modality requires.
    #[error("malformed query")]
    MalformedQuery,

    /// The backend returned an unusable hit list (rank gaps, duplicate
    /// ids, wrong source tag). Partial data is an error, not a result.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Why embedding the query text failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmbeddingCause {
    /// The provider throttled the request.
    #[error("rate limited")]
    RateLimited,

    /// The provider rejected the input text.
    #[error("invalid input")]
    InvalidInput,

    /// The provider was unreachable.
    #[error("provider unavailable")]
    Unavailable,
}

/// A failed source and the rendered cause, for the aggregated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Source that failed.
    pub source: SourceKind,
    /// Rendered failure message.
    pub message: String,
}

fn failure_summary(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.source, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The main error type for rankmerge operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankMergeError {
    /// Invalid request configuration, rejected before dispatch.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single retrieval source failed.
    #[error("{source} retrieval failed: {cause}")]
    Retrieval {
        /// Source that failed.
        source: SourceKind,
        /// Why it failed.
        #[source]
        cause: RetrievalCause,
    },

    /// Embedding the query text failed; treated as a failed vector
    /// dispatch for the degrade decision.
    #[error("embedding failed: {0}")]
    Embedding(EmbeddingCause),

    /// Every retrieval source failed, so no fusion was possible.
    #[error("all retrieval sources failed: {}", failure_summary(.0))]
    AllSourcesFailed(Vec<SourceFailure>),
}

/// Result type alias for operations that may fail with [`RankMergeError`].
pub type Result<T> = std::result::Result<T, RankMergeError>;

impl RankMergeError {
    /// Create a new invalid-configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RankMergeError::InvalidConfig(msg.into())
    }

    /// Create a new per-source retrieval error.
    pub fn retrieval(source: SourceKind, cause: RetrievalCause) -> Self {
        RankMergeError::Retrieval { source, cause }
    }

    /// Create a new timeout error for a source.
    pub fn timeout(source: SourceKind) -> Self {
        RankMergeError::Retrieval {
            source,
            cause: RetrievalCause::Timeout,
        }
    }

    /// Create a malformed-response error for a source.
    pub fn malformed_response<S: Into<String>>(source: SourceKind, msg: S) -> Self {
        RankMergeError::Retrieval {
            source,
            cause: RetrievalCause::MalformedResponse(msg.into()),
        }
    }

    /// Aggregate per-source failures into a total-failure error.
    pub fn all_sources_failed(failures: Vec<(SourceKind, RankMergeError)>) -> Self {
        RankMergeError::AllSourcesFailed(
            failures
                .into_iter()
                .map(|(source, err)| SourceFailure {
                    source,
                    message: err.to_string(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RankMergeError::invalid_config("k must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration: k must be at least 1"
        );

        let err = RankMergeError::timeout(SourceKind::Text);
        assert_eq!(err.to_string(), "text retrieval failed: deadline exceeded");

        let err = RankMergeError::Embedding(EmbeddingCause::RateLimited);
        assert_eq!(err.to_string(), "embedding failed: rate limited");
    }

    #[test]
    fn test_aggregated_failure_names_every_source() {
        let err = RankMergeError::all_sources_failed(vec![
            (
                SourceKind::Vector,
                RankMergeError::retrieval(SourceKind::Vector, RetrievalCause::Unavailable),
            ),
            (SourceKind::Text, RankMergeError::timeout(SourceKind::Text)),
        ]);

        let rendered = err.to_string();
        assert!(rendered.contains("vector:"));
        assert!(rendered.contains("text:"));
        assert!(rendered.contains("deadline exceeded"));
    }

    #[test]
    fn test_malformed_response_carries_detail() {
        let err = RankMergeError::malformed_response(SourceKind::Vector, "duplicate doc id 'a'");
        assert_eq!(
            err.to_string(),
            "vector retrieval failed: malformed response: duplicate doc id 'a'"
        );
    }
}
