//! Midnight Game Engine
//!
//! Platform-agnostic core of the Midnight dice game: qualification and
//! scoring, pluggable keep strategies, the per-player turn loop and the
//! round loop that builds, pays out or carries the pot.

pub mod config;
pub mod constants;
pub mod dice;
pub mod error;
pub mod game;
pub mod naming;
pub mod numbers;
pub mod player;
pub mod sampling;
pub mod score;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use config::{GameConfig, WagerRule};
pub use dice::{Dice, DiceRoller, Die, ScriptedDice, SeededDice, qualifies, score_dice};
pub use error::{ConfigError, GameError};
pub use game::{Game, RoundRecord, Winner};
pub use naming::NameGenerator;
pub use player::{Player, PlayerOptions, Stake, TurnPhase, TurnSummary};
pub use sampling::{DecisionStep, ScoreHistogram, sample_scores, trace_turn};
pub use score::{Score, ScoreError};
pub use stats::{GameStats, PlayerSummary, Seat};
pub use strategy::{
    Always, CompoundStrategy, Conservative, KeepMax, Middle, PotAware, QualifierHunter,
    RoundContext, SimpleStrategy, StrategyError, StrategyId, UnknownStrategy, check_keep,
};
