//! Weighted reciprocal rank fusion over per-source hit lists.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::types::{FusedResult, RankedHit, SourceKind, SourceWeights};

/// Pure weighted-RRF scorer.
///
/// For each document `d` the fused score is
/// `sum over sources s containing d of weight[s] / (C + rank_s(d))`.
/// A document absent from a source contributes exactly 0 for that
/// source; no sentinel rank is substituted. Identical inputs always
/// produce identical output.
#[derive(Debug, Clone)]
pub struct RankFuser {
    weights: SourceWeights,
    rank_constant: u32,
}

impl RankFuser {
    /// Create a fuser with the given weights and rank constant.
    pub fn new(weights: SourceWeights, rank_constant: u32) -> Self {
        Self {
            weights,
            rank_constant,
        }
    }

    /// Fuse the given per-source hit lists over the union of their
    /// document ids. Empty input yields an empty map, never an error.
    pub fn fuse(&self, hits_by_source: &[(SourceKind, &[RankedHit])]) -> AHashMap<String, FusedResult> {
        let constant = f64::from(self.rank_constant);
        let mut fused: AHashMap<String, FusedResult> = AHashMap::new();

        for (source, hits) in hits_by_source {
            let weight = self.weights.get(*source);
            for hit in *hits {
                let term = weight / (constant + hit.rank as f64);
                let entry = fused
                    .entry(hit.doc_id.clone())
                    .or_insert_with(|| FusedResult {
                        doc_id: hit.doc_id.clone(),
                        payload: None,
                        fused_score: 0.0,
                        contributing_ranks: BTreeMap::new(),
                    });
                entry.fused_score += term;
                entry.contributing_ranks.insert(*source, hit.rank);
                if entry.payload.is_none() {
                    entry.payload = hit.payload.clone();
                }
            }
        }

        fused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn hits(source: SourceKind, ids: &[&str]) -> Vec<RankedHit> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RankedHit::new(*id, i + 1, source))
            .collect()
    }

    fn unit_fuser() -> RankFuser {
        RankFuser::new(SourceWeights::default(), 60)
    }

    #[test]
    fn test_worked_example_scores() {
        // vector {A:1, B:2, C:3}, text {B:1, C:2, D:3}, unit weights, C=60.
        let vector = hits(SourceKind::Vector, &["A", "B", "C"]);
        let text = hits(SourceKind::Text, &["B", "C", "D"]);

        let fused = unit_fuser().fuse(&[
            (SourceKind::Vector, vector.as_slice()),
            (SourceKind::Text, text.as_slice()),
        ]);

        assert_eq!(fused.len(), 4);
        assert!((fused["A"].fused_score - 1.0 / 61.0).abs() < EPSILON);
        assert!((fused["B"].fused_score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < EPSILON);
        assert!((fused["C"].fused_score - (1.0 / 63.0 + 1.0 / 62.0)).abs() < EPSILON);
        assert!((fused["D"].fused_score - 1.0 / 63.0).abs() < EPSILON);
    }

    #[test]
    fn test_contributing_ranks_recorded() {
        let vector = hits(SourceKind::Vector, &["A", "B"]);
        let text = hits(SourceKind::Text, &["B"]);

        let fused = unit_fuser().fuse(&[
            (SourceKind::Vector, vector.as_slice()),
            (SourceKind::Text, text.as_slice()),
        ]);

        assert_eq!(fused["A"].contributing_ranks.len(), 1);
        assert_eq!(fused["A"].contributing_ranks[&SourceKind::Vector], 1);
        assert_eq!(fused["B"].contributing_ranks.len(), 2);
        assert_eq!(fused["B"].contributing_ranks[&SourceKind::Vector], 2);
        assert_eq!(fused["B"].contributing_ranks[&SourceKind::Text], 1);
    }

    #[test]
    fn test_absence_contributes_zero() {
        // A appears only in the vector list; its score must equal the
        // single vector term exactly, for several weight/C settings.
        for (weights, constant) in [
            (SourceWeights::default(), 60),
            (SourceWeights { vector: 2.5, text: 9.0 }, 1),
            (SourceWeights { vector: 0.1, text: 100.0 }, 7),
        ] {
            let vector = hits(SourceKind::Vector, &["A"]);
            let text = hits(SourceKind::Text, &["B"]);

            let fused = RankFuser::new(weights, constant).fuse(&[
                (SourceKind::Vector, vector.as_slice()),
                (SourceKind::Text, text.as_slice()),
            ]);

            let expected = weights.vector / (f64::from(constant) + 1.0);
            assert!((fused["A"].fused_score - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn test_monotonicity_within_source() {
        let vector = hits(SourceKind::Vector, &["r1", "r2", "r3", "r4", "r5"]);
        let fused = unit_fuser().fuse(&[(SourceKind::Vector, vector.as_slice())]);

        for window in [1usize, 2, 3, 4].windows(2) {
            let better = &fused[&format!("r{}", window[0])];
            let worse = &fused[&format!("r{}", window[1])];
            assert!(
                better.fused_score > worse.fused_score,
                "rank {} should outscore rank {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_weights_scale_source_terms() {
        let vector = hits(SourceKind::Vector, &["A"]);
        let text = hits(SourceKind::Text, &["A"]);
        let fuser = RankFuser::new(SourceWeights { vector: 3.0, text: 0.5 }, 60);

        let fused = fuser.fuse(&[
            (SourceKind::Vector, vector.as_slice()),
            (SourceKind::Text, text.as_slice()),
        ]);

        let expected = 3.0 / 61.0 + 0.5 / 61.0;
        assert!((fused["A"].fused_score - expected).abs() < EPSILON);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(unit_fuser().fuse(&[]).is_empty());
        assert!(
            unit_fuser()
                .fuse(&[(SourceKind::Vector, &[][..]), (SourceKind::Text, &[][..])])
                .is_empty()
        );
    }

    #[test]
    fn test_fuse_is_idempotent() {
        let vector = hits(SourceKind::Vector, &["A", "B", "C"]);
        let text = hits(SourceKind::Text, &["B", "C", "D"]);
        let lists = [
            (SourceKind::Vector, vector.as_slice()),
            (SourceKind::Text, text.as_slice()),
        ];

        let first = unit_fuser().fuse(&lists);
        let second = unit_fuser().fuse(&lists);
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_carried_from_first_source_with_one() {
        let vector = vec![RankedHit::new("A", 1, SourceKind::Vector)];
        let text = vec![RankedHit::new("A", 1, SourceKind::Text).with_payload("body")];

        let fused = unit_fuser().fuse(&[
            (SourceKind::Vector, vector.as_slice()),
            (SourceKind::Text, text.as_slice()),
        ]);

        assert_eq!(fused["A"].payload.as_deref(), Some("body"));
    }
}
