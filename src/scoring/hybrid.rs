//! Hybrid Score Combination
//!
//! Blends the textual and phonetic sub-scores into the final score by
//! regime: strong text stands alone, mid-range text is blended with the
//! phonetic score, and a stronger phonetic score rescues weak text.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::scoring::phonetic::PhoneticScore;
use crate::scoring::scorer::MainScore;
use crate::search::models::{BlendWeights, MatchType, ScoringMethod};

/// Combined score before hit enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: f64,
    pub match_type: MatchType,
    pub method: ScoringMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<BlendWeights>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Combine the textual score with the optional phonetic score.
pub fn combine(
    main: &MainScore,
    phonetic: Option<&PhoneticScore>,
    config: &ScoringConfig,
) -> FinalScore {
    let text_score = main.total_score;
    let phon_value = phonetic.map(|p| p.score).unwrap_or(0.0);

    if text_score >= config.text_only_threshold {
        return FinalScore {
            score: text_score,
            match_type: main.match_type,
            method: ScoringMethod::TextOnly,
            weights: None,
        };
    }

    if text_score >= config.hybrid_floor && phon_value > 0.0 {
        // The better the text score, the less the phonetic side weighs.
        let text_weight = 0.7 + text_score / 40.0;
        let phon_weight = 1.0 - text_weight;
        let blended = text_score * text_weight + phon_value * phon_weight;
        return FinalScore {
            score: round2(blended),
            match_type: MatchType::Hybrid,
            method: ScoringMethod::Weighted,
            weights: Some(BlendWeights {
                text: round2(text_weight),
                phon: round2(phon_weight),
            }),
        };
    }

    if let Some(p) = phonetic {
        if p.score > text_score {
            return FinalScore {
                score: p.score,
                match_type: p.match_type,
                method: ScoringMethod::PhoneticFallback,
                weights: None,
            };
        }
    }

    FinalScore {
        score: text_score,
        match_type: main.match_type,
        method: ScoringMethod::TextOnly,
        weights: None,
    }
}

/// The exact cap: only `exact_full` may reach the exact threshold.
/// Returns the capped score and whether capping happened.
pub fn apply_exact_cap(score: f64, match_type: MatchType, config: &ScoringConfig) -> (f64, bool) {
    if match_type != MatchType::ExactFull && score >= config.exact_threshold {
        (config.exact_cap, true)
    } else {
        (score, false)
    }
}

// ============================================================================
// Tests
// ============================================================================
