//! Test Suite
//!
//! End-to-end engine tests against a scripted oracle, plus property-based
//! invariants for the scoring and ranking pipeline.

mod property;
