//! Field Evaluation
//!
//! Greedy one-to-one alignment of query tokens to candidate tokens, and the
//! per-field aggregates (distances, coverage, extras) the scorers consume.
//!
//! The greedy assignment is part of the scoring contract: swapping it for an
//! optimal assignment would drift observable scores.

use serde::{Deserialize, Serialize};

use crate::search::synonyms::SynonymTable;
use crate::text::distance::{distance, dynamic_max};

// ============================================================================
// Types
// ============================================================================

/// How a query token matched a candidate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Synonym,
    Levenshtein,
}

/// One aligned (query token, candidate token) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMatch {
    pub query_word: String,
    pub matched_word: String,
    pub distance: usize,
    #[serde(rename = "type")]
    pub kind: MatchKind,
    /// Index into the candidate's token sequence; consumed for the rest of
    /// the field evaluation.
    pub position: usize,
}

/// Penalty view of a field evaluation, carried on hits for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyIndices {
    pub missing_words: usize,
    pub average_distance: f64,
    pub length_ratio: f64,
    pub coverage_ratio: f64,
    pub extra_length: usize,
    pub extra_length_ratio: f64,
}

impl Default for PenaltyIndices {
    fn default() -> Self {
        Self {
            missing_words: 0,
            average_distance: 0.0,
            length_ratio: 1.0,
            coverage_ratio: 1.0,
            extra_length: 0,
            extra_length_ratio: 0.0,
        }
    }
}

/// Full output of scoring one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldEval {
    pub found: Vec<WordMatch>,
    pub not_found: Vec<String>,
    pub total_distance: usize,
    /// 0 when nothing was found.
    pub average_distance: f64,
    pub found_count: usize,
    pub query_count: usize,
    pub result_count: usize,
    /// Total character length of unconsumed candidate tokens.
    pub extra_length: usize,
    pub extra_length_ratio: f64,
    pub penalties: PenaltyIndices,
}

// ============================================================================
// Field Evaluator
// ============================================================================

/// Aligns lowercased query tokens against lowercased candidate tokens.
pub struct FieldEvaluator<'a> {
    max_distance: usize,
    synonyms: &'a SynonymTable,
}

impl<'a> FieldEvaluator<'a> {
    pub fn new(max_distance: usize, synonyms: &'a SynonymTable) -> Self {
        Self {
            max_distance,
            synonyms,
        }
    }

    /// Match two tokens: exact and synonym pairs count as distance 0,
    /// everything else pays a bounded edit distance capped by the word's
    /// own length heuristic.
    fn word_match(&self, query_word: &str, candidate_word: &str, position: usize) -> WordMatch {
        if query_word == candidate_word {
            return WordMatch {
                query_word: query_word.to_string(),
                matched_word: candidate_word.to_string(),
                distance: 0,
                kind: MatchKind::Exact,
                position,
            };
        }

        if self.synonyms.same_class(query_word, candidate_word) {
            return WordMatch {
                query_word: query_word.to_string(),
                matched_word: candidate_word.to_string(),
                distance: 0,
                kind: MatchKind::Synonym,
                position,
            };
        }

        let bound = self.max_distance.min(dynamic_max(query_word));
        WordMatch {
            query_word: query_word.to_string(),
            matched_word: candidate_word.to_string(),
            distance: distance(query_word, candidate_word, bound),
            kind: MatchKind::Levenshtein,
            position,
        }
    }

    /// Best still-unused candidate position for a query token, or `None`
    /// when every candidate is farther than the ceiling. Ties keep the
    /// earlier position; a distance of 0 stops the scan.
    fn best_word_match(
        &self,
        query_word: &str,
        candidate_words: &[String],
        used: &[bool],
    ) -> Option<WordMatch> {
        let mut best: Option<WordMatch> = None;
        let mut best_distance = self.max_distance + 1;

        for (position, candidate_word) in candidate_words.iter().enumerate() {
            if used[position] {
                continue;
            }
            let m = self.word_match(query_word, candidate_word, position);
            if m.distance < best_distance {
                best_distance = m.distance;
                best = Some(m);
                if best_distance == 0 {
                    break;
                }
            }
        }

        best
    }

    /// Evaluate one field. `query_text` is the reference text whose
    /// character length normalizes the extras penalty.
    pub fn evaluate(
        &self,
        query_words: &[String],
        candidate_words: &[String],
        query_text: &str,
    ) -> FieldEval {
        let mut found = Vec::new();
        let mut not_found = Vec::new();
        let mut total_distance = 0usize;
        let mut used = vec![false; candidate_words.len()];

        for query_word in query_words {
            match self.best_word_match(query_word, candidate_words, &used) {
                Some(m) => {
                    used[m.position] = true;
                    total_distance += m.distance;
                    found.push(m);
                }
                None => not_found.push(query_word.clone()),
            }
        }

        let found_count = found.len();
        let query_count = query_words.len();
        let result_count = candidate_words.len();

        let average_distance = if found_count > 0 {
            total_distance as f64 / found_count as f64
        } else {
            0.0
        };

        let length_ratio = if query_count > 0 && result_count > 0 {
            query_count.min(result_count) as f64 / query_count.max(result_count) as f64
        } else {
            1.0
        };

        let coverage_ratio = if query_count > 0 {
            found_count as f64 / query_count as f64
        } else {
            1.0
        };

        let extra_length: usize = candidate_words
            .iter()
            .enumerate()
            .filter(|(pos, _)| !used[*pos])
            .map(|(_, word)| word.chars().count())
            .sum();

        let query_length = query_text.chars().count();
        let extra_length_ratio = if query_length > 0 {
            extra_length as f64 / query_length as f64
        } else {
            0.0
        };

        FieldEval {
            penalties: PenaltyIndices {
                missing_words: not_found.len(),
                average_distance,
                length_ratio,
                coverage_ratio,
                extra_length,
                extra_length_ratio,
            },
            found,
            not_found,
            total_distance,
            average_distance,
            found_count,
            query_count,
            result_count,
            extra_length,
            extra_length_ratio,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
