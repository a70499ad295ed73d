//! Search Models
//!
//! Data structures shared across the pipeline: preprocessed query forms,
//! index candidates, scored hits, request options, and replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::evaluator::PenaltyIndices;
use crate::scoring::phonetic::PhoneticScore;

// ============================================================================
// Query Forms
// ============================================================================

/// Normalized variants of a user query, produced once per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryForms {
    pub original: String,
    pub cleaned: String,
    pub no_space: String,
    /// Space-separated phonetic codes; may be empty.
    pub soundex: String,
    pub words_original: Vec<String>,
    pub words_cleaned: Vec<String>,
    /// Always a single-element sequence holding the no-space form.
    pub words_no_space: Vec<String>,
    pub original_length: usize,
    pub cleaned_length: usize,
    pub no_space_length: usize,
}

impl QueryForms {
    /// True when preprocessing consumed the whole input.
    pub fn is_empty(&self) -> bool {
        self.original_length == 0
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// A raw hit from the index: a handful of typed attributes plus an opaque
/// passthrough bag. Missing attributes deserialize to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_etab: Option<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_search: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_no_space: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_soundex: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

fn scalar_key(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

impl Candidate {
    /// Identity used for deduplication: `id`, else `id_etab`. Hits without
    /// either are dropped from deduplicated output.
    pub fn record_id(&self) -> Option<String> {
        self.id_key().or_else(|| self.id_etab_key())
    }

    pub fn id_key(&self) -> Option<String> {
        scalar_key(self.id.as_ref())
    }

    pub fn id_etab_key(&self) -> Option<String> {
        scalar_key(self.id_etab.as_ref())
    }

    /// Whether an upstream exact-match path already tagged this hit.
    /// The tag exempts the hit from the exact cap; it is never produced
    /// by this engine.
    pub fn pretagged_exact_full(&self) -> bool {
        matches!(
            self.attributes.get("_match_type"),
            Some(Value::String(s)) if s == "exact_full"
        )
    }
}

// ============================================================================
// Match Classification
// ============================================================================

/// How a scored hit matched the query. Ordering of the variants is
/// cosmetic; ranking uses `priority()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Reserved for the upstream exact-match path; never emitted here.
    ExactFull,
    ExactWithExtras,
    NoSpaceMatch,
    NearPerfect,
    PhoneticStrict,
    ExactWithMissing,
    FuzzyFull,
    Hybrid,
    PhoneticTolerant,
    FuzzyPartial,
    Partial,
}

impl MatchType {
    pub fn priority(self) -> u8 {
        match self {
            MatchType::ExactFull => 0,
            MatchType::ExactWithExtras | MatchType::NoSpaceMatch => 1,
            MatchType::NearPerfect => 2,
            MatchType::PhoneticStrict => 3,
            MatchType::ExactWithMissing => 4,
            MatchType::FuzzyFull => 5,
            MatchType::Hybrid => 6,
            MatchType::PhoneticTolerant => 7,
            MatchType::FuzzyPartial => 8,
            MatchType::Partial => 9,
        }
    }
}

/// Which path produced the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    TextOnly,
    Weighted,
    PhoneticFallback,
}

/// Blend weights recorded on hybrid scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub text: f64,
    pub phon: f64,
}

// ============================================================================
// Discovery Strategies
// ============================================================================

/// The index-side searches a candidate can surface through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStrategy {
    NameSearch,
    NoSpace,
    Standard,
    Phonetic,
}

impl DiscoveryStrategy {
    /// Fixed deduplication order; the first strategy to surface a record
    /// keeps it.
    pub const PRIORITY_ORDER: [DiscoveryStrategy; 4] = [
        DiscoveryStrategy::NameSearch,
        DiscoveryStrategy::NoSpace,
        DiscoveryStrategy::Standard,
        DiscoveryStrategy::Phonetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiscoveryStrategy::NameSearch => "name_search",
            DiscoveryStrategy::NoSpace => "no_space",
            DiscoveryStrategy::Standard => "standard",
            DiscoveryStrategy::Phonetic => "phonetic",
        }
    }
}

// ============================================================================
// Scored Hits
// ============================================================================

/// A candidate enriched with the re-ranking verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHit {
    #[serde(flatten)]
    pub candidate: Candidate,

    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(rename = "_match_type")]
    pub match_type: MatchType,
    #[serde(rename = "_match_priority")]
    pub match_priority: u8,
    #[serde(rename = "_scoring_method")]
    pub scoring_method: ScoringMethod,
    #[serde(rename = "_scoring_weights", skip_serializing_if = "Option::is_none")]
    pub scoring_weights: Option<BlendWeights>,
    #[serde(rename = "_phonetic_details", skip_serializing_if = "Option::is_none")]
    pub phonetic_details: Option<PhoneticScore>,
    #[serde(rename = "_capped", default)]
    pub capped: bool,
    /// Penalty view of the winning field evaluation, used for tie-breaking.
    #[serde(rename = "_penalty_indices")]
    pub penalty_indices: PenaltyIndices,
    #[serde(rename = "_discovery_strategy")]
    pub discovery_strategy: DiscoveryStrategy,
}

// ============================================================================
// Options & Replies
// ============================================================================

/// Per-request options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Final reply truncation.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Per-request Levenshtein ceiling; negatives are clamped to 0.
    #[serde(default = "default_max_distance")]
    pub max_distance: i64,

    /// Opaque filter expression, forwarded to the index unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,

    /// Apply geographic dispersion to the (non-exact) reply.
    #[serde(default)]
    pub disperse: bool,
}

fn default_limit() -> usize {
    10
}

fn default_max_distance() -> i64 {
    4
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            max_distance: default_max_distance(),
            filters: None,
            disperse: false,
        }
    }
}

impl SearchOptions {
    /// The Levenshtein ceiling with invalid values clamped, never rejected.
    pub fn clamped_max_distance(&self) -> usize {
        self.max_distance.max(0) as usize
    }
}

/// Reply of a search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReply {
    pub hits: Vec<ScoredHit>,
    pub total: usize,
    pub has_exact_results: bool,
    pub exact_count: usize,
    pub total_before_filter: usize,
    pub query_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<QueryForms>,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchReply {
    /// Sentinel reply for queries that preprocess to nothing.
    pub fn empty_query() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            has_exact_results: false,
            exact_count: 0,
            total_before_filter: 0,
            query_time_ms: 0.0,
            preprocessing: None,
            from_cache: false,
            error: Some("Empty query".to_string()),
        }
    }
}

/// Result cache introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
}
