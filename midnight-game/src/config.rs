//! Game configuration and wager rules.
use serde::{Deserialize, Serialize};

use crate::constants::{ANTE, DEFAULT_ROUNDS};
use crate::error::ConfigError;

/// How a player's wager responds to qualifying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WagerRule {
    /// One ante to play, a second one when the hand qualifies.
    #[default]
    QualifierAddsAnte,
    /// Two antes to play, one refunded when the hand qualifies.
    QualifierSavesAnte,
}

impl WagerRule {
    /// Wager posted before the first roll.
    #[must_use]
    pub const fn opening_wager(self, ante: i64) -> i64 {
        match self {
            Self::QualifierAddsAnte => ante,
            Self::QualifierSavesAnte => ante * 2,
        }
    }

    /// Final wager once the hand is complete.
    #[must_use]
    pub const fn settled_wager(self, ante: i64, qualified: bool) -> i64 {
        let opening = self.opening_wager(ante);
        match (self, qualified) {
            (Self::QualifierAddsAnte, true) => opening + ante,
            (Self::QualifierSavesAnte, true) => opening - ante,
            (_, false) => opening,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::QualifierAddsAnte => "qualifier-adds-ante",
            Self::QualifierSavesAnte => "qualifier-saves-ante",
        }
    }
}

/// Construction parameters for a [`crate::Game`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_rounds")]
    pub rounds: u32,
    /// Dice seed; a fresh one is drawn (and recorded) when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub wager_rule: WagerRule,
    #[serde(default = "GameConfig::default_ante")]
    pub ante: i64,
}

impl GameConfig {
    #[must_use]
    pub const fn default_rounds() -> u32 {
        DEFAULT_ROUNDS
    }

    #[must_use]
    pub const fn default_ante() -> i64 {
        ANTE
    }

    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn with_wager_rule(mut self, wager_rule: WagerRule) -> Self {
        self.wager_rule = wager_rule;
        self
    }

    #[must_use]
    pub const fn with_ante(mut self, ante: i64) -> Self {
        self.ante = ante;
        self
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON, or the validation error
    /// when a field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds < 1 {
            return Err(ConfigError::MinViolation {
                field: "rounds",
                min: 1,
                value: i64::from(self.rounds),
            });
        }
        if self.ante < 1 {
            return Err(ConfigError::MinViolation {
                field: "ante",
                min: 1,
                value: self.ante,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: Self::default_rounds(),
            seed: None,
            wager_rule: WagerRule::default(),
            ante: Self::default_ante(),
        }
    }
}
