//! Discovery Strategies
//!
//! Queries the oracle once per strategy — each with its own query variant
//! and attribute restriction — then merges the hit sets by fixed strategy
//! priority, keeping the first copy of every record.

use std::collections::HashSet;

use serde_json::Value;

use super::client::{OracleParams, SearchOracle};
use super::error::Result;
use super::models::{Candidate, DiscoveryStrategy, QueryForms};

// ============================================================================
// Plans
// ============================================================================

/// One oracle call: a query variant restricted to one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyPlan {
    pub strategy: DiscoveryStrategy,
    pub query: String,
    pub attribute: &'static str,
}

/// The full fan-out for one request. The phonetic strategy is skipped when
/// the query produced no soundex codes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub name_search: StrategyPlan,
    pub no_space: StrategyPlan,
    pub standard: StrategyPlan,
    pub phonetic: Option<StrategyPlan>,
}

/// Build the strategy plans for a preprocessed query.
pub fn build_plans(forms: &QueryForms) -> SearchPlan {
    let name_search_query = if forms.cleaned.is_empty() {
        forms.original.clone()
    } else {
        forms.cleaned.clone()
    };

    SearchPlan {
        name_search: StrategyPlan {
            strategy: DiscoveryStrategy::NameSearch,
            query: name_search_query,
            attribute: "name_search",
        },
        no_space: StrategyPlan {
            strategy: DiscoveryStrategy::NoSpace,
            query: forms.no_space.clone(),
            attribute: "name_no_space",
        },
        standard: StrategyPlan {
            strategy: DiscoveryStrategy::Standard,
            query: forms.original.clone(),
            attribute: "name",
        },
        phonetic: if forms.soundex.is_empty() {
            None
        } else {
            Some(StrategyPlan {
                strategy: DiscoveryStrategy::Phonetic,
                query: forms.soundex.clone(),
                attribute: "name_soundex",
            })
        },
    }
}

// ============================================================================
// Fan-out
// ============================================================================

async fn run_plan(
    oracle: &dyn SearchOracle,
    index: &str,
    plan: &StrategyPlan,
    filter: Option<&Value>,
    limit: usize,
) -> Result<(DiscoveryStrategy, Vec<Candidate>)> {
    let params = OracleParams {
        limit,
        searchable_attributes: vec![plan.attribute.to_string()],
        filter: filter.cloned(),
    };
    let hits = oracle.search(index, &plan.query, &params).await?;
    Ok((plan.strategy, hits))
}

async fn run_optional(
    oracle: &dyn SearchOracle,
    index: &str,
    plan: Option<&StrategyPlan>,
    filter: Option<&Value>,
    limit: usize,
) -> Result<Option<(DiscoveryStrategy, Vec<Candidate>)>> {
    match plan {
        Some(p) => Ok(Some(run_plan(oracle, index, p, filter, limit).await?)),
        None => Ok(None),
    }
}

/// Run every planned strategy concurrently. Any single failure fails the
/// whole call. The output order is the fixed strategy order regardless of
/// completion order.
pub async fn run_strategies(
    oracle: &dyn SearchOracle,
    index: &str,
    plan: &SearchPlan,
    filter: Option<&Value>,
    limit: usize,
) -> Result<Vec<(DiscoveryStrategy, Vec<Candidate>)>> {
    let (name_search, no_space, standard, phonetic) = tokio::join!(
        run_plan(oracle, index, &plan.name_search, filter, limit),
        run_plan(oracle, index, &plan.no_space, filter, limit),
        run_plan(oracle, index, &plan.standard, filter, limit),
        run_optional(oracle, index, plan.phonetic.as_ref(), filter, limit),
    );

    let mut results = vec![name_search?, no_space?, standard?];
    if let Some(extra) = phonetic? {
        results.push(extra);
    }
    Ok(results)
}

// ============================================================================
// Deduplication
// ============================================================================

/// Merge strategy result sets: walk strategies in the fixed priority order,
/// keep the first occurrence of every record id, drop identifier-less hits.
pub fn deduplicate(
    results: &[(DiscoveryStrategy, Vec<Candidate>)],
) -> Vec<(DiscoveryStrategy, Candidate)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for wanted in DiscoveryStrategy::PRIORITY_ORDER {
        for (strategy, hits) in results.iter().filter(|(s, _)| *s == wanted) {
            for hit in hits {
                let Some(id) = hit.record_id() else {
                    continue;
                };
                if seen.insert(id) {
                    unique.push((*strategy, hit.clone()));
                }
            }
        }
    }

    unique
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::preprocess::preprocess;

    fn candidate(id: u64, name: &str) -> Candidate {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    #[test]
    fn plans_cover_the_four_strategies() {
        let plan = build_plans(&preprocess("Crêperie du Port"));
        assert_eq!(plan.name_search.query, "creperie du port");
        assert_eq!(plan.name_search.attribute, "name_search");
        assert_eq!(plan.no_space.query, "creperieduport");
        assert_eq!(plan.standard.query, "crêperie du port");
        let phonetic = plan.phonetic.expect("soundex present");
        assert_eq!(phonetic.attribute, "name_soundex");
        assert!(!phonetic.query.is_empty());
    }

    #[test]
    fn phonetic_plan_skipped_without_soundex() {
        // Digits clean to a form that yields no soundex codes.
        let plan = build_plans(&preprocess("1234"));
        assert!(plan.phonetic.is_none());
    }

    #[test]
    fn cleaned_empty_falls_back_to_original() {
        // Punctuation-only input keeps an original form but cleans away.
        let plan = build_plans(&preprocess("!!!"));
        assert_eq!(plan.name_search.query, "!!!");
        assert_eq!(plan.no_space.query, "");
    }

    #[test]
    fn first_strategy_keeps_the_record() {
        let shared = candidate(1, "Chez Marcel");
        let results = vec![
            (DiscoveryStrategy::NameSearch, vec![shared.clone()]),
            (DiscoveryStrategy::NoSpace, vec![shared.clone()]),
            (DiscoveryStrategy::Standard, vec![candidate(2, "Autre")]),
            (DiscoveryStrategy::Phonetic, vec![shared.clone()]),
        ];
        let unique = deduplicate(&results);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].0, DiscoveryStrategy::NameSearch);
        assert_eq!(unique[0].1.record_id(), Some("1".to_string()));
        assert_eq!(unique[1].0, DiscoveryStrategy::Standard);
    }

    #[test]
    fn dedup_ignores_result_set_ordering() {
        let shared = candidate(1, "Chez Marcel");
        // Same sets delivered out of order: priority still decides.
        let results = vec![
            (DiscoveryStrategy::Phonetic, vec![shared.clone()]),
            (DiscoveryStrategy::NameSearch, vec![shared.clone()]),
        ];
        let unique = deduplicate(&results);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].0, DiscoveryStrategy::NameSearch);
    }

    #[test]
    fn identifier_less_hits_are_dropped() {
        let anonymous: Candidate =
            serde_json::from_value(serde_json::json!({ "name": "Sans Id" })).unwrap();
        let results = vec![(DiscoveryStrategy::NameSearch, vec![anonymous])];
        assert!(deduplicate(&results).is_empty());
    }

    #[test]
    fn dedup_is_idempotent() {
        let results = vec![
            (DiscoveryStrategy::NameSearch, vec![candidate(1, "A")]),
            (DiscoveryStrategy::NoSpace, vec![candidate(1, "A")]),
        ];
        let once = deduplicate(&results);
        let again = deduplicate(&[(DiscoveryStrategy::NameSearch, vec![once[0].1.clone()])]);
        assert_eq!(again.len(), 1);
        assert_eq!(once[0].1.record_id(), again[0].1.record_id());
    }
}
