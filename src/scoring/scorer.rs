//! Main Text Scorer
//!
//! Scores the `name_search` and `name_no_space` fields of a candidate,
//! arbitrates between the two interpretations, applies the progressive
//! `name` bonus, and classifies the match.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::scoring::evaluator::{FieldEval, FieldEvaluator, PenaltyIndices};
use crate::search::models::{MatchType, QueryForms};
use crate::search::synonyms::SynonymTable;

// ============================================================================
// Types
// ============================================================================

/// Which field interpretation won the arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinningStrategy {
    NameSearch,
    NoSpace,
    None,
}

/// Full output of the textual scoring pass for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainScore {
    pub name_search_score: f64,
    pub no_space_score: f64,
    pub base_score: f64,
    pub winning_strategy: WinningStrategy,
    pub name_bonus: f64,
    /// `base_score + name_bonus`, capped at 12.
    pub total_score: f64,
    pub match_type: MatchType,
    pub all_words_found: bool,
    /// Penalty view of the winning evaluation; informational when no
    /// strategy won.
    pub penalty_indices: PenaltyIndices,
    pub name_search_eval: FieldEval,
    pub no_space_eval: FieldEval,
    pub name_eval: FieldEval,
}

// ============================================================================
// Main Scorer
// ============================================================================

pub struct MainScorer<'a> {
    config: &'a ScoringConfig,
    evaluator: FieldEvaluator<'a>,
}

fn field_tokens(field: &str) -> Vec<String> {
    field
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

impl<'a> MainScorer<'a> {
    pub fn new(
        config: &'a ScoringConfig,
        max_distance: usize,
        synonyms: &'a SynonymTable,
    ) -> Self {
        Self {
            config,
            evaluator: FieldEvaluator::new(max_distance, synonyms),
        }
    }

    /// Score one candidate's name fields against the preprocessed query.
    pub fn score(
        &self,
        forms: &QueryForms,
        name: &str,
        name_search: &str,
        name_no_space: &str,
    ) -> MainScore {
        if forms.words_cleaned.is_empty() {
            return MainScore {
                name_search_score: 0.0,
                no_space_score: 0.0,
                base_score: 0.0,
                winning_strategy: WinningStrategy::None,
                name_bonus: 0.0,
                total_score: 0.0,
                match_type: MatchType::Partial,
                all_words_found: false,
                penalty_indices: PenaltyIndices::default(),
                name_search_eval: FieldEval::default(),
                no_space_eval: FieldEval::default(),
                name_eval: FieldEval::default(),
            };
        }

        let eval_search = self.evaluator.evaluate(
            &forms.words_cleaned,
            &field_tokens(name_search),
            &forms.cleaned,
        );
        let name_search_score = self.strategy_score(&eval_search);

        let eval_no_space = self.evaluator.evaluate(
            &forms.words_no_space,
            &field_tokens(name_no_space),
            &forms.no_space,
        );
        let mut no_space_score = self.strategy_score(&eval_no_space);
        if no_space_score < self.config.no_space_min_score {
            no_space_score = 0.0;
        }

        let search_valid = name_search_score > 0.0 && eval_search.found_count > 0;
        let no_space_valid = no_space_score > 0.0 && eval_no_space.found_count > 0;

        let (winning_strategy, base_score) =
            if no_space_valid && (!search_valid || no_space_score >= name_search_score) {
                (WinningStrategy::NoSpace, no_space_score)
            } else if search_valid {
                (WinningStrategy::NameSearch, name_search_score)
            } else {
                (WinningStrategy::None, 0.0)
            };
        let winning_eval = match winning_strategy {
            WinningStrategy::NoSpace => &eval_no_space,
            // The name_search evaluation fills the slot for structure when
            // nothing won; downstream only reads it when found_count > 0.
            WinningStrategy::NameSearch | WinningStrategy::None => &eval_search,
        };

        let eval_name = self.evaluator.evaluate(
            &forms.words_original,
            &field_tokens(name),
            &forms.original,
        );
        let name_bonus = self.name_bonus(&eval_name);

        let total_score = (base_score + name_bonus).min(12.0);
        let match_type = Self::match_type(winning_eval, winning_strategy, total_score);

        MainScore {
            name_search_score,
            no_space_score,
            base_score,
            winning_strategy,
            name_bonus,
            total_score,
            match_type,
            all_words_found: winning_eval.penalties.missing_words == 0,
            penalty_indices: winning_eval.penalties,
            name_search_eval: eval_search,
            no_space_eval: eval_no_space,
            name_eval: eval_name,
        }
    }

    /// Adjusted field score: raw distance score minus the weighted
    /// penalties, floored at 0.
    fn strategy_score(&self, eval: &FieldEval) -> f64 {
        if eval.found_count == 0 {
            return 0.0;
        }
        let raw = (10.0 - eval.total_distance as f64).clamp(0.0, 10.0);
        let p = &eval.penalties;
        let penalty = self.config.w_missing * p.missing_words as f64
            + self.config.w_fuzzy * p.average_distance.max(0.0)
            + self.config.w_ratio * (1.0 - p.length_ratio.clamp(0.0, 1.0))
            + self.config.w_extra_length * p.extra_length_ratio * 10.0;
        (raw - penalty).max(0.0)
    }

    /// Progressive bonus from the display-name field. Gated on word-count
    /// ratio and extras, attenuated toward the gate boundary.
    fn name_bonus(&self, eval: &FieldEval) -> f64 {
        let cfg = self.config;
        let word_count_ratio = if eval.query_count > 0 && eval.result_count > 0 {
            eval.query_count.min(eval.result_count) as f64
                / eval.query_count.max(eval.result_count) as f64
        } else {
            0.0
        };
        let extra_length_ratio = eval.extra_length_ratio;

        if word_count_ratio < cfg.bonus_word_ratio_min
            || extra_length_ratio > cfg.bonus_extra_ratio_max
        {
            return 0.0;
        }

        let score_terms: f64 = eval
            .found
            .iter()
            .map(|m| match m.distance {
                0 => 1.0,
                1 => 0.7,
                2 => 0.4,
                _ => 0.2,
            })
            .sum();
        let score_ratio = score_terms / eval.query_count.max(1) as f64;
        let bonus_base = cfg.bonus_max * score_ratio;

        let reduction = cfg.bonus_missing * eval.penalties.missing_words as f64
            + cfg.bonus_avg_distance * eval.average_distance.max(0.0)
            + cfg.bonus_max * extra_length_ratio * 0.6;
        let bonus = (bonus_base - reduction).clamp(0.0, cfg.bonus_max);

        let attenuation_range = 1.0 - cfg.bonus_word_ratio_min;
        let attenuation =
            ((word_count_ratio - cfg.bonus_word_ratio_min) / attenuation_range).clamp(0.0, 1.0);

        bonus * attenuation
    }

    fn match_type(
        winning: &FieldEval,
        strategy: WinningStrategy,
        total_score: f64,
    ) -> MatchType {
        if winning.found_count == 0 {
            return MatchType::Partial;
        }
        let missing = winning.penalties.missing_words;

        if winning.average_distance == 0.0 {
            if missing == 0 {
                if strategy == WinningStrategy::NoSpace {
                    MatchType::NoSpaceMatch
                } else {
                    MatchType::ExactWithExtras
                }
            } else {
                MatchType::ExactWithMissing
            }
        } else if missing == 0 {
            if total_score >= 8.0 {
                MatchType::NearPerfect
            } else {
                MatchType::FuzzyFull
            }
        } else {
            MatchType::FuzzyPartial
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
