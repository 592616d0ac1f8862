// Data-driven engine configuration.
//
// Every tunable of the search lives in `EngineConfig` rather than in magic
// numbers: the attempt budget, the acceptance and early-exit scores, the
// syllable tolerance and pool window, the word-count floor, and the score
// jitter. `Default` gives the stock tuning; `from_json` loads an override
// file where any omitted field keeps its default.
//
// See also: `generator.rs` and `matcher.rs`, the only readers.

use serde::{Deserialize, Serialize};

/// Errors from loading or validating an `EngineConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable parameters for pool filtering, matching, and acceptance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum sampling attempts per generation run. Zero is allowed and
    /// always yields an empty batch.
    pub attempt_budget: u32,
    /// A match is accepted only when its score is strictly greater.
    pub acceptance_threshold: f64,
    /// The matcher stops scanning once a candidate scores strictly greater.
    pub early_exit_score: f64,
    /// Largest syllable-count difference the matcher will consider. At most
    /// `max_syllables - min_syllables`, the widest gap two pooled lines have.
    pub syllable_tolerance: usize,
    /// Inclusive lower bound on a pooled line's syllable count.
    pub min_syllables: usize,
    /// Inclusive upper bound on a pooled line's syllable count.
    pub max_syllables: usize,
    /// A pooled line must have strictly more words than this.
    pub min_words_exclusive: usize,
    /// Relative size of the random score bonus (0.1 = up to +10%).
    pub score_jitter: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attempt_budget: 150,
            acceptance_threshold: 0.4,
            early_exit_score: 0.8,
            syllable_tolerance: 2,
            min_syllables: 4,
            max_syllables: 16,
            min_words_exclusive: 3,
            score_jitter: 0.1,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the search cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_syllables > self.max_syllables {
            return Err(ConfigError::Invalid {
                field: "min_syllables",
                reason: format!(
                    "{} exceeds max_syllables {}",
                    self.min_syllables, self.max_syllables
                ),
            });
        }
        let span = self.max_syllables - self.min_syllables;
        if self.syllable_tolerance > span {
            return Err(ConfigError::Invalid {
                field: "syllable_tolerance",
                reason: format!(
                    "{} exceeds the syllable window span {span}",
                    self.syllable_tolerance
                ),
            });
        }
        for (field, value) in [
            ("acceptance_threshold", self.acceptance_threshold),
            ("early_exit_score", self.early_exit_score),
            ("score_jitter", self.score_jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a finite non-negative number"),
                });
            }
        }
        Ok(())
    }
}
