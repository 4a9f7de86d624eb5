//! Search request construction and validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RankMergeError, Result};
use crate::types::SourceWeights;

/// Default number of fused results to return.
pub const DEFAULT_K: usize = 10;

/// Conventional RRF rank constant.
pub const DEFAULT_RANK_CONSTANT: u32 = 60;

/// Default per-source retrieval deadline.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// One hybrid search call. Defaults are applied at construction time
/// and the whole request is validated before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text for lexical retrieval (and embedding, when needed).
    pub query_text: String,

    /// Precomputed query vector. When absent the engine asks its
    /// embedder, if it has one.
    pub query_vector: Option<Vec<f32>>,

    /// Number of fused results desired.
    pub k: usize,

    /// Per-source fusion weights.
    pub weights: SourceWeights,

    /// RRF rank constant; larger values flatten the influence of top
    /// ranks.
    pub rank_constant: u32,

    /// Whether a single-source failure still yields (degraded) results.
    pub degrade_on_partial_failure: bool,

    /// Deadline applied independently to each retrieval call.
    pub source_timeout: Duration,
}

impl SearchRequest {
    /// Create a request with default settings.
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            query_vector: None,
            k: DEFAULT_K,
            weights: SourceWeights::default(),
            rank_constant: DEFAULT_RANK_CONSTANT,
            degrade_on_partial_failure: true,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    /// Supply a precomputed query vector.
    pub fn with_query_vector(mut self, vector: Vec<f32>) -> Self {
        self.query_vector = Some(vector);
        self
    }

    /// Set the number of results desired.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the per-source fusion weights.
    pub fn with_weights(mut self, vector: f64, text: f64) -> Self {
        self.weights = SourceWeights { vector, text };
        self
    }

    /// Set the RRF rank constant.
    pub fn with_rank_constant(mut self, rank_constant: u32) -> Self {
        self.rank_constant = rank_constant;
        self
    }

    /// Enable or disable the degrade policy.
    pub fn with_degrade_on_partial_failure(mut self, degrade: bool) -> Self {
        self.degrade_on_partial_failure = degrade;
        self
    }

    /// Set the per-source retrieval deadline.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Validate the request. Rejected requests are never dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.k < 1 {
            return Err(RankMergeError::invalid_config("k must be at least 1"));
        }

        for (name, weight) in [
            ("vector", self.weights.vector),
            ("text", self.weights.text),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(RankMergeError::invalid_config(format!(
                    "{name} weight must be a finite value greater than 0, got {weight}"
                )));
            }
        }

        if self.rank_constant == 0 {
            return Err(RankMergeError::invalid_config(
                "rank constant must be greater than 0",
            ));
        }

        if self.query_text.trim().is_empty() && self.query_vector.is_none() {
            return Err(RankMergeError::invalid_config(
                "query text is empty and no query vector was supplied",
            ));
        }

        if self.source_timeout.is_zero() {
            return Err(RankMergeError::invalid_config(
                "source timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}
