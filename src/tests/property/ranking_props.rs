//! Property-based tests for Ranking & Deduplication
//!
//! Tests invariants:
//! - Sorted scores are non-increasing
//! - Ranking does not depend on input order when ids are unique
//! - Sorting is idempotent
//! - Deduplication keeps exactly one copy per id, tagged with the
//!   highest-priority discovery strategy

use proptest::prelude::*;

use crate::scoring::evaluator::PenaltyIndices;
use crate::scoring::ranking::sort_hits;
use crate::search::models::{
    Candidate, DiscoveryStrategy, MatchType, ScoredHit, ScoringMethod,
};
use crate::search::strategies::deduplicate;

// ============================================================================
// Generators
// ============================================================================

fn arb_penalties() -> impl Strategy<Value = PenaltyIndices> {
    (
        0usize..4,
        0.0f64..4.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0usize..30,
        0.0f64..3.0,
    )
        .prop_map(
            |(missing, avg, length, coverage, extra, extra_ratio)| PenaltyIndices {
                missing_words: missing,
                average_distance: avg,
                length_ratio: length,
                coverage_ratio: coverage,
                extra_length: extra,
                extra_length_ratio: extra_ratio,
            },
        )
}

fn hit_with(id: u64, score: f64, penalties: PenaltyIndices) -> ScoredHit {
    let candidate: Candidate =
        serde_json::from_value(serde_json::json!({ "id": id, "name": format!("n{id}") })).unwrap();
    ScoredHit {
        candidate,
        score,
        match_type: MatchType::FuzzyFull,
        match_priority: MatchType::FuzzyFull.priority(),
        scoring_method: ScoringMethod::TextOnly,
        scoring_weights: None,
        phonetic_details: None,
        capped: false,
        penalty_indices: penalties,
        discovery_strategy: DiscoveryStrategy::NameSearch,
    }
}

fn arb_hits() -> impl Strategy<Value = Vec<ScoredHit>> {
    prop::collection::vec((0u64..50, 0.0f64..=9.99, arb_penalties()), 0..20).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (id, score, penalties))| hit_with(id * 100 + i as u64, score, penalties))
            .collect()
    })
}

// ============================================================================
// Ranking Properties
// ============================================================================

proptest! {
    #[test]
    fn sorted_scores_are_non_increasing(hits in arb_hits()) {
        let sorted = sort_hits(hits);
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score - 1e-9);
        }
    }

    #[test]
    fn sorting_is_idempotent(hits in arb_hits()) {
        let once = sort_hits(hits);
        let twice = sort_hits(once.clone());
        let ids = |v: &[ScoredHit]| -> Vec<String> {
            v.iter().map(|h| h.candidate.record_id().unwrap()).collect()
        };
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn order_is_independent_of_input_permutation(hits in arb_hits()) {
        // Ids are unique by construction, so no tie ever reaches the
        // input-position breaker.
        let mut reversed = hits.clone();
        reversed.reverse();
        let ids = |v: &[ScoredHit]| -> Vec<String> {
            v.iter().map(|h| h.candidate.record_id().unwrap()).collect()
        };
        prop_assert_eq!(ids(&sort_hits(hits)), ids(&sort_hits(reversed)));
    }
}

// ============================================================================
// Deduplication Properties
// ============================================================================

fn arb_strategy_results() -> impl Strategy<Value = Vec<(DiscoveryStrategy, Vec<u64>)>> {
    let ids = prop::collection::vec(0u64..10, 0..8);
    (ids.clone(), ids.clone(), ids.clone(), ids).prop_map(|(a, b, c, d)| {
        vec![
            (DiscoveryStrategy::NameSearch, a),
            (DiscoveryStrategy::NoSpace, b),
            (DiscoveryStrategy::Standard, c),
            (DiscoveryStrategy::Phonetic, d),
        ]
    })
}

fn materialize(results: &[(DiscoveryStrategy, Vec<u64>)]) -> Vec<(DiscoveryStrategy, Vec<Candidate>)> {
    results
        .iter()
        .map(|(strategy, ids)| {
            let candidates = ids
                .iter()
                .map(|id| {
                    serde_json::from_value(serde_json::json!({ "id": id, "name": "x" })).unwrap()
                })
                .collect();
            (*strategy, candidates)
        })
        .collect()
}

proptest! {
    #[test]
    fn dedup_keeps_one_copy_per_id(results in arb_strategy_results()) {
        let unique = deduplicate(&materialize(&results));
        let mut seen = std::collections::HashSet::new();
        for (_, candidate) in &unique {
            prop_assert!(seen.insert(candidate.record_id().unwrap()));
        }
    }

    #[test]
    fn dedup_tags_the_first_strategy(results in arb_strategy_results()) {
        let unique = deduplicate(&materialize(&results));
        for (strategy, candidate) in &unique {
            let id = candidate.record_id().unwrap();
            let expected = DiscoveryStrategy::PRIORITY_ORDER
                .into_iter()
                .find(|wanted| {
                    results
                        .iter()
                        .any(|(s, ids)| s == wanted && ids.iter().any(|i| i.to_string() == id))
                })
                .unwrap();
            prop_assert_eq!(*strategy, expected);
        }
    }

    #[test]
    fn dedup_is_idempotent(results in arb_strategy_results()) {
        let once = deduplicate(&materialize(&results));
        let as_single: Vec<(DiscoveryStrategy, Vec<Candidate>)> = vec![(
            DiscoveryStrategy::NameSearch,
            once.iter().map(|(_, c)| c.clone()).collect(),
        )];
        let twice = deduplicate(&as_single);
        prop_assert_eq!(once.len(), twice.len());
    }
}
