//! Deterministic Ranking
//!
//! Composite sort over scored hits. Float comparisons use fixed epsilons
//! and the original input position closes every tie, so the order never
//! depends on the host sort's stability.

use std::cmp::Ordering;

use crate::scoring::evaluator::PenaltyIndices;
use crate::search::models::ScoredHit;

const SCORE_EPSILON: f64 = 1e-9;
const EXTRA_RATIO_THRESHOLD: f64 = 0.01;
const LENGTH_RATIO_THRESHOLD: f64 = 0.001;

fn compare_penalties(a: &PenaltyIndices, b: &PenaltyIndices) -> Ordering {
    // Fewer extras first.
    if (a.extra_length_ratio - b.extra_length_ratio).abs() > EXTRA_RATIO_THRESHOLD {
        return a
            .extra_length_ratio
            .partial_cmp(&b.extra_length_ratio)
            .unwrap_or(Ordering::Equal);
    }
    // Better length ratio first.
    if (a.length_ratio - b.length_ratio).abs() > LENGTH_RATIO_THRESHOLD {
        return b
            .length_ratio
            .partial_cmp(&a.length_ratio)
            .unwrap_or(Ordering::Equal);
    }
    // Lower average distance first.
    a.average_distance
        .partial_cmp(&b.average_distance)
        .unwrap_or(Ordering::Equal)
}

fn compare_hits(a: &ScoredHit, index_a: usize, b: &ScoredHit, index_b: usize) -> Ordering {
    // 1) Score, descending.
    if (a.score - b.score).abs() > SCORE_EPSILON {
        return b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal);
    }

    // 2-4) Penalty refinements.
    let by_penalties = compare_penalties(&a.penalty_indices, &b.penalty_indices);
    if by_penalties != Ordering::Equal {
        return by_penalties;
    }

    // 5) Identifier, ascending (id, else id_etab; then id_etab).
    let key_a = a
        .candidate
        .id_key()
        .or_else(|| a.candidate.id_etab_key())
        .unwrap_or_default();
    let key_b = b
        .candidate
        .id_key()
        .or_else(|| b.candidate.id_etab_key())
        .unwrap_or_default();
    match key_a.cmp(&key_b) {
        Ordering::Equal => {}
        other => return other,
    }
    let etab_a = a.candidate.id_etab_key().unwrap_or_default();
    let etab_b = b.candidate.id_etab_key().unwrap_or_default();
    match etab_a.cmp(&etab_b) {
        Ordering::Equal => {}
        other => return other,
    }

    // 6) Original input position.
    index_a.cmp(&index_b)
}

/// Sort hits by the composite key. The input position is captured before
/// sorting and used as the final tie-breaker.
pub fn sort_hits(hits: Vec<ScoredHit>) -> Vec<ScoredHit> {
    let mut indexed: Vec<(usize, ScoredHit)> = hits.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| compare_hits(a, *ia, b, *ib));
    indexed.into_iter().map(|(_, hit)| hit).collect()
}

// ============================================================================
// Tests
// ============================================================================
