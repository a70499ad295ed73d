//! Property-based tests for the re-ranking engine
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `ranking_props`: Tests for ranking and deduplication
//!   - Sorted scores are non-increasing
//!   - Order is independent of input permutation when ids are unique
//!   - Sorting is idempotent
//!   - Deduplication keeps one copy per id, tagged with the first strategy
//!
//! - `scoring_props`: Tests for the scoring pipeline
//!   - Final scores stay in [0, 9.99] without an upstream exact tag
//!   - Strategy scores stay in [0, 10]
//!   - Synonym registration is symmetric across the whole class
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable.

mod ranking_props;
mod scoring_props;
