use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Result cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
    /// Advisory cap on cached replies; reaching it triggers an expiry sweep.
    pub cache_max_entries: usize,
    /// Default reply truncation when the request does not set a limit.
    pub default_limit: usize,
    pub scoring: ScoringConfig,
}

/// Scoring weights and thresholds.
///
/// Changing any of these shifts observable scores; the defaults are the
/// calibrated production values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-request Levenshtein ceiling applied during word alignment.
    pub max_levenshtein_distance: usize,
    /// Hits scoring below this are dropped before ranking.
    pub min_score: f64,

    // Strategy score penalties.
    pub w_missing: f64,
    pub w_fuzzy: f64,
    pub w_ratio: f64,
    pub w_extra_length: f64,

    // Name-field bonus.
    pub bonus_max: f64,
    pub bonus_missing: f64,
    pub bonus_avg_distance: f64,
    pub bonus_word_ratio_min: f64,
    pub bonus_extra_ratio_max: f64,

    // Thresholds.
    /// Floor under which a no_space strategy score is zeroed.
    pub no_space_min_score: f64,
    /// Scores at or above this count as exact results.
    pub exact_threshold: f64,
    /// Cap applied to non-exact_full hits reaching the exact threshold.
    pub exact_cap: f64,
    /// Text score at or above this skips phonetic blending entirely.
    pub text_only_threshold: f64,
    /// Lower bound of the hybrid blending window.
    pub hybrid_floor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
            cache_max_entries: 1000,
            default_limit: 10,
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_levenshtein_distance: 4,
            min_score: 3.0,
            w_missing: 0.6,
            w_fuzzy: 0.5,
            w_ratio: 1.0,
            w_extra_length: 0.15,
            bonus_max: 2.0,
            bonus_missing: 0.3,
            bonus_avg_distance: 0.35,
            bonus_word_ratio_min: 0.4,
            bonus_extra_ratio_max: 1.0,
            no_space_min_score: 7.0,
            exact_threshold: 10.0,
            exact_cap: 9.99,
            text_only_threshold: 8.5,
            hybrid_floor: 6.0,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `~/.config/meilirank/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meilirank")
            .join("config.toml")
    }
}
