use thiserror::Error;

use crate::score::ScoreError;
use crate::strategy::StrategyError;

/// Errors raised when a game configuration violates its documented bounds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("invalid game config: {0}")]
    Parse(String),
}

/// Errors surfaced by players, games and strategy sampling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot play a game without players")]
    NoPlayers,
    #[error("players cannot join once play has started")]
    RosterLocked,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("strategy `{strategy}` broke the keep contract: {source}")]
    Strategy {
        strategy: &'static str,
        #[source]
        source: StrategyError,
    },
    #[error("hand holds {kept} dice and cannot take {adding} more")]
    HandOverflow { kept: usize, adding: usize },
    #[error("a turn needs exactly {expected} starting dice (got {actual})")]
    InvalidStart { expected: usize, actual: usize },
}
