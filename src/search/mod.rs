//! Search Pipeline
//!
//! Request-side plumbing around the scoring core: preprocessing, discovery
//! strategies against the index oracle, deduplication, caching, and the
//! engine that ties them together.

pub mod cache;
pub mod client;
pub mod dispersion;
pub mod engine;
pub mod error;
pub mod models;
pub mod preprocess;
pub mod strategies;
pub mod synonyms;

pub use client::{MeiliOracle, OracleParams, SearchOracle};
pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use models::{
    CacheStats, Candidate, DiscoveryStrategy, MatchType, QueryForms, ScoredHit, ScoringMethod,
    SearchOptions, SearchReply,
};
pub use preprocess::preprocess;
pub use synonyms::SynonymTable;
