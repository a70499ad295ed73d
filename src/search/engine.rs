//! Search Engine
//!
//! Orchestrates a request end to end: preprocess the query, fan out the
//! discovery strategies, deduplicate, re-score every candidate, rank
//! deterministically, apply the exact-only policy, and cache the reply.
//! Also carries the admin surface (synonyms, cache control).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::config::{EngineConfig, ScoringConfig};
use crate::scoring::hybrid::{apply_exact_cap, combine};
use crate::scoring::ranking::sort_hits;
use crate::scoring::scorer::MainScorer;
use crate::scoring::PhoneticScorer;
use crate::search::cache::ResultCache;
use crate::search::client::SearchOracle;
use crate::search::dispersion;
use crate::search::error::Result;
use crate::search::models::{
    CacheStats, Candidate, DiscoveryStrategy, MatchType, QueryForms, ScoredHit, SearchOptions,
    SearchReply,
};
use crate::search::preprocess::preprocess;
use crate::search::strategies::{build_plans, deduplicate, run_strategies};
use crate::search::synonyms::SynonymTable;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ============================================================================
// Search Engine
// ============================================================================

pub struct SearchEngine {
    oracle: Arc<dyn SearchOracle>,
    config: EngineConfig,
    synonyms: RwLock<SynonymTable>,
    cache: RwLock<ResultCache>,
}

impl SearchEngine {
    pub fn new(oracle: Arc<dyn SearchOracle>, config: EngineConfig) -> Self {
        let cache = ResultCache::new(config.cache_max_entries, config.cache_ttl_secs);
        Self {
            oracle,
            config,
            synonyms: RwLock::new(SynonymTable::default()),
            cache: RwLock::new(cache),
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(oracle: Arc<dyn SearchOracle>) -> Self {
        Self::new(oracle, EngineConfig::default())
    }

    // ========================================================================
    // Search API
    // ========================================================================

    /// Run one search. Every oracle failure is fatal for the whole call and
    /// leaves the cache untouched.
    pub async fn search(
        &self,
        index: &str,
        user_query: &str,
        options: SearchOptions,
    ) -> Result<SearchReply> {
        let started = Instant::now();

        let forms = preprocess(user_query);
        if forms.is_empty() {
            log::debug!("Empty query on index '{index}' — sentinel reply");
            return Ok(SearchReply::empty_query());
        }

        let cache_key = ResultCache::key(index, &forms.original, &options);
        if let Some(reply) = self.cache.read().await.get(&cache_key) {
            log::debug!("Cache hit for '{}' on '{index}'", forms.original);
            return Ok(reply);
        }
        log::debug!("Cache miss for '{}' on '{index}'", forms.original);

        // Discovery: up to four concurrent index queries, merged by fixed
        // strategy priority.
        let plan = build_plans(&forms);
        let raw = run_strategies(
            self.oracle.as_ref(),
            index,
            &plan,
            options.filters.as_ref(),
            options.limit,
        )
        .await?;
        let unique = deduplicate(&raw);
        let total_before_filter = unique.len();

        // Scoring: per-request scorer so the request ceiling never leaks
        // into concurrent calls.
        let synonyms = self.synonyms.read().await.clone();
        let scoring = &self.config.scoring;
        let scorer = MainScorer::new(scoring, options.clamped_max_distance(), &synonyms);
        let phonetic_scorer = PhoneticScorer::new();

        let mut enriched: Vec<ScoredHit> = Vec::with_capacity(unique.len());
        for (strategy, candidate) in unique {
            let hit = classify_hit(&scorer, &phonetic_scorer, scoring, strategy, candidate, &forms);
            if hit.score >= scoring.min_score {
                enriched.push(hit);
            }
        }

        let sorted = sort_hits(enriched);

        // Exact-only policy: when any hit clears the exact threshold, the
        // reply narrows to those hits.
        let exact: Vec<ScoredHit> = sorted
            .iter()
            .filter(|h| h.score >= scoring.exact_threshold)
            .cloned()
            .collect();
        let has_exact_results = !exact.is_empty();
        let exact_count = exact.len();

        let mut selected = if has_exact_results { exact } else { sorted };
        if options.disperse && !has_exact_results {
            selected = dispersion::disperse(selected);
        }
        selected.truncate(options.limit);

        let query_time_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
        log::info!(
            "Search '{}' on '{index}': {} hits of {total_before_filter} candidates in {query_time_ms} ms",
            forms.original,
            selected.len(),
        );

        let reply = SearchReply {
            total: selected.len(),
            hits: selected,
            has_exact_results,
            exact_count,
            total_before_filter,
            query_time_ms,
            preprocessing: Some(forms),
            from_cache: false,
            error: None,
        };
        self.cache.write().await.insert(cache_key, reply.clone());
        Ok(reply)
    }

    // ========================================================================
    // Admin API
    // ========================================================================

    /// Replace the synonym table.
    pub async fn set_synonyms(&self, map: BTreeMap<String, Vec<String>>) {
        self.synonyms.write().await.replace(map);
    }

    pub async fn get_synonyms(&self) -> BTreeMap<String, Vec<String>> {
        self.synonyms.read().await.to_map()
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

// ============================================================================
// Hit Classification
// ============================================================================

/// Enrich one candidate with the full scoring verdict.
fn classify_hit(
    scorer: &MainScorer<'_>,
    phonetic_scorer: &PhoneticScorer,
    scoring: &ScoringConfig,
    strategy: DiscoveryStrategy,
    candidate: Candidate,
    forms: &QueryForms,
) -> ScoredHit {
    let main = scorer.score(
        forms,
        &candidate.name,
        &candidate.name_search,
        &candidate.name_no_space,
    );
    let phonetic = phonetic_scorer.score(&forms.soundex, &candidate.name_soundex);
    let combined = combine(&main, phonetic.as_ref(), scoring);

    // An upstream exact-match path may have tagged the hit already; the
    // tag survives classification and exempts the hit from the cap.
    let match_type = if candidate.pretagged_exact_full() {
        MatchType::ExactFull
    } else {
        combined.match_type
    };
    let (score, capped) = apply_exact_cap(combined.score, match_type, scoring);

    ScoredHit {
        candidate,
        score,
        match_type,
        match_priority: match_type.priority(),
        scoring_method: combined.method,
        scoring_weights: combined.weights,
        phonetic_details: phonetic,
        capped,
        penalty_indices: main.penalty_indices,
        discovery_strategy: strategy,
    }
}
