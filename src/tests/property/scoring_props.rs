//! Property-based tests for the Scoring Pipeline
//!
//! Tests invariants:
//! - Strategy scores stay in [0, 10]
//! - Combined, capped scores stay in [0, 9.99]
//! - Phonetic scores stay in [0, 7.5]
//! - `partial` classification implies nothing was found
//! - Synonym classes are symmetric under alignment

use proptest::prelude::*;
use std::collections::BTreeMap;

use crate::config::ScoringConfig;
use crate::scoring::evaluator::FieldEvaluator;
use crate::scoring::hybrid::{apply_exact_cap, combine};
use crate::scoring::scorer::MainScorer;
use crate::scoring::PhoneticScorer;
use crate::search::models::MatchType;
use crate::search::preprocess::preprocess;
use crate::search::synonyms::SynonymTable;

// ============================================================================
// Generators
// ============================================================================

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,10}"
}

fn arb_phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 1..4).prop_map(|words| words.join(" "))
}

fn arb_soundex() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][0-9]{3}", 0..3).prop_map(|codes| codes.join(" "))
}

// ============================================================================
// Score Bound Properties
// ============================================================================

proptest! {
    #[test]
    fn strategy_scores_stay_in_bounds(query in arb_phrase(), name in arb_phrase()) {
        let config = ScoringConfig::default();
        let synonyms = SynonymTable::default();
        let scorer = MainScorer::new(&config, config.max_levenshtein_distance, &synonyms);
        let forms = preprocess(&query);
        let no_space_name: String = name.split_whitespace().collect();

        let main = scorer.score(&forms, &name, &name, &no_space_name);
        prop_assert!((0.0..=10.0).contains(&main.name_search_score));
        prop_assert!((0.0..=10.0).contains(&main.no_space_score));
        prop_assert!(
            main.base_score == main.name_search_score
                || main.base_score == main.no_space_score
                || main.base_score == 0.0
        );
        prop_assert!((0.0..=12.0).contains(&main.total_score));
        prop_assert!(
            (main.total_score - (main.base_score + main.name_bonus).min(12.0)).abs() < 1e-9
        );
    }

    #[test]
    fn final_scores_never_pass_the_cap(
        query in arb_phrase(),
        name in arb_phrase(),
        candidate_soundex in arb_soundex(),
    ) {
        let config = ScoringConfig::default();
        let synonyms = SynonymTable::default();
        let scorer = MainScorer::new(&config, config.max_levenshtein_distance, &synonyms);
        let forms = preprocess(&query);
        let no_space_name: String = name.split_whitespace().collect();

        let main = scorer.score(&forms, &name, &name, &no_space_name);
        let phonetic = PhoneticScorer::new().score(&forms.soundex, &candidate_soundex);
        let combined = combine(&main, phonetic.as_ref(), &config);
        let (score, capped) = apply_exact_cap(combined.score, combined.match_type, &config);

        prop_assert!(combined.match_type != MatchType::ExactFull);
        prop_assert!(score >= 0.0);
        // Without the upstream exact tag, nothing reaches the threshold.
        prop_assert!(score < config.exact_threshold);
        prop_assert!(!capped || score == config.exact_cap);
    }

    #[test]
    fn phonetic_scores_stay_in_bounds(q in arb_soundex(), h in arb_soundex()) {
        if let Some(p) = PhoneticScorer::new().score(&q, &h) {
            prop_assert!((0.0..=7.5).contains(&p.score));
            prop_assert!((0.0..=1.0).contains(&p.ratio));
            prop_assert!(p.found <= p.query_tokens);
        }
    }

    #[test]
    fn partial_means_nothing_found(query in arb_phrase(), name in arb_phrase()) {
        let config = ScoringConfig::default();
        let synonyms = SynonymTable::default();
        let scorer = MainScorer::new(&config, config.max_levenshtein_distance, &synonyms);
        let forms = preprocess(&query);

        let main = scorer.score(&forms, &name, &name, &name);
        if main.match_type == MatchType::Partial {
            prop_assert_eq!(main.base_score, 0.0);
        }
    }
}

// ============================================================================
// Synonym Properties
// ============================================================================

proptest! {
    #[test]
    fn synonym_classes_are_symmetric(
        members in prop::collection::btree_set("[a-z]{2,8}", 2..5),
    ) {
        let members: Vec<String> = members.into_iter().collect();
        let mut map = BTreeMap::new();
        map.insert(members[0].clone(), members[1..].to_vec());
        let table = SynonymTable::from_map(map);

        let evaluator = FieldEvaluator::new(0, &table);
        for a in &members {
            for b in &members {
                prop_assert!(table.same_class(a, b) || a == b);
                // Alignment sees every pairing as distance 0, even with
                // fuzzy matching disabled.
                let eval = evaluator.evaluate(
                    std::slice::from_ref(a),
                    std::slice::from_ref(b),
                    a,
                );
                prop_assert_eq!(eval.found_count, 1);
                prop_assert_eq!(eval.total_distance, 0);
            }
        }
    }
}
