//! Phonetic Scorer
//!
//! Scores the overlap between the query's French-Soundex codes and the
//! candidate's `name_soundex` codes. A strict pass runs first; a tolerant
//! pass (bounded edit distance on long codes) only replaces it when the
//! strict score is weak and tolerance strictly improves the overlap.

use serde::{Deserialize, Serialize};

use crate::search::models::MatchType;
use crate::text::distance::distance;

// ============================================================================
// Types
// ============================================================================

/// Outcome of phonetic scoring for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneticScore {
    pub score: f64,
    pub ratio: f64,
    pub found: usize,
    pub query_tokens: usize,
    /// `phonetic_strict` or `phonetic_tolerant`.
    pub match_type: MatchType,
    pub tolerant_used: bool,
}

// ============================================================================
// Phonetic Scorer
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneticScorer;

fn phonetic_tokens(s: &str) -> Vec<String> {
    s.split_whitespace()
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() > 1)
        .collect()
}

/// Greedy one-to-one code assignment. Rules, in order: equality (stops the
/// scan), prefix with min length 4, and — in tolerant mode — edit distance
/// ≤ 1 on codes of min length 6. The first candidate claimed stays claimed.
fn match_tokens(q_tokens: &[String], c_tokens: &[String], tolerant: bool) -> (usize, bool) {
    let mut used = vec![false; c_tokens.len()];
    let mut matches = 0;
    let mut tolerant_used = false;

    for qt in q_tokens {
        let mut best_idx: Option<usize> = None;
        let mut is_tolerant = false;

        for (i, ct) in c_tokens.iter().enumerate() {
            if used[i] {
                continue;
            }

            if qt == ct {
                best_idx = Some(i);
                is_tolerant = false;
                break;
            }

            let minlen = qt.chars().count().min(ct.chars().count());
            if minlen >= 4 && (qt.starts_with(ct.as_str()) || ct.starts_with(qt.as_str())) {
                if best_idx.is_none() {
                    best_idx = Some(i);
                    is_tolerant = false;
                }
                continue;
            }

            if tolerant && minlen >= 6 && distance(qt, ct, 1) <= 1 && best_idx.is_none() {
                best_idx = Some(i);
                is_tolerant = true;
            }
        }

        if let Some(i) = best_idx {
            used[i] = true;
            matches += 1;
            if is_tolerant {
                tolerant_used = true;
            }
        }
    }

    (matches, tolerant_used)
}

/// Regime caps: a full overlap is worth at most 7.5, a strong one 7.0,
/// anything else 6.0.
fn capped_score(found: usize, total: usize) -> (f64, f64) {
    let ratio = found as f64 / total as f64;
    let s = 8.0 * ratio;
    let score = if found == total {
        s.min(7.5)
    } else if ratio >= 0.66 {
        s.min(7.0)
    } else {
        s.min(6.0)
    };
    (score, ratio)
}

impl PhoneticScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score the phonetic overlap, or `None` when either side carries no
    /// usable codes.
    pub fn score(&self, query_soundex: &str, name_soundex: &str) -> Option<PhoneticScore> {
        let q = query_soundex.trim();
        let h = name_soundex.trim();
        if q.is_empty() || h.is_empty() {
            return None;
        }

        let q_tokens = phonetic_tokens(q);
        let h_tokens = phonetic_tokens(h);
        if q_tokens.is_empty() || h_tokens.is_empty() {
            return None;
        }

        let (strict_found, _) = match_tokens(&q_tokens, &h_tokens, false);
        let (mut score, mut ratio) = capped_score(strict_found, q_tokens.len());
        let mut found = strict_found;
        let mut match_type = MatchType::PhoneticStrict;
        let mut tolerant_used = false;

        if score < 6.0 {
            let (tol_found, tol_rule_used) = match_tokens(&q_tokens, &h_tokens, true);
            let (tol_score, tol_ratio) = capped_score(tol_found, q_tokens.len());
            if tol_ratio > ratio {
                score = tol_score;
                ratio = tol_ratio;
                found = tol_found;
                match_type = MatchType::PhoneticTolerant;
                tolerant_used = tol_rule_used;
            }
        }

        Some(PhoneticScore {
            score,
            ratio,
            found,
            query_tokens: q_tokens.len(),
            match_type,
            tolerant_used,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
