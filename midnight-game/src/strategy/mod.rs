//! Dice-keeping strategies.
//!
//! A [`SimpleStrategy`] decides from the dice alone. A [`CompoundStrategy`]
//! also sees the [`RoundContext`] and may switch between simple policies.
//! Both receive read-only views of the kept and rolled dice and return only
//! the subset of `rolled` to keep; the caller reconciles the rest.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dice::{Dice, Die, take_one};
use crate::score::Score;

pub mod compound;
pub mod simple;

pub use compound::PotAware;
pub use simple::{Conservative, KeepMax, Middle, QualifierHunter};

/// Round state visible to compound strategies when a player starts a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    /// Best score posted so far this round.
    pub leading_score: Score,
    /// Players still to act after the current one.
    pub players_remaining: usize,
    /// Chips already in the pot, including any carried over from a tie.
    pub current_pot: i64,
}

/// Policy that decides from the kept and freshly rolled dice only.
pub trait SimpleStrategy: fmt::Debug + Send {
    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Pick the dice of `rolled` to keep. Must be non-empty and drawn from `rolled`.
    fn decide(&self, kept: &[Die], rolled: &[Die]) -> Dice;
}

/// Policy that may additionally consult the round context.
pub trait CompoundStrategy: fmt::Debug + Send {
    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Pick the dice of `rolled` to keep. Must be non-empty and drawn from `rolled`.
    fn decide(&self, kept: &[Die], rolled: &[Die], ctx: &RoundContext) -> Dice;
}

/// Plays the wrapped simple strategy regardless of context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Always<S>(pub S);

impl<S: SimpleStrategy> CompoundStrategy for Always<S> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn decide(&self, kept: &[Die], rolled: &[Die], _ctx: &RoundContext) -> Dice {
        self.0.decide(kept, rolled)
    }
}

/// A strategy returned a keep set that breaks the keep contract.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("strategy kept no dice")]
    EmptyKeep,
    #[error("strategy kept a {die} that was not rolled")]
    NotRolled { die: Die },
}

/// Verify that `keep` is non-empty and a sub-multiset of `rolled`.
///
/// # Errors
///
/// Returns the first contract violation found.
pub fn check_keep(rolled: &[Die], keep: &[Die]) -> Result<(), StrategyError> {
    if keep.is_empty() {
        return Err(StrategyError::EmptyKeep);
    }
    let mut available: Dice = rolled.iter().copied().collect();
    for &die in keep {
        if !take_one(&mut available, die) {
            return Err(StrategyError::NotRolled { die });
        }
    }
    Ok(())
}

/// Built-in strategies selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    Conservative,
    Middle,
    KeepMax,
    QualifierHunter,
    PotAware,
}

impl StrategyId {
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Conservative,
            Self::Middle,
            Self::KeepMax,
            Self::QualifierHunter,
            Self::PotAware,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Middle => "middle",
            Self::KeepMax => "keep-max",
            Self::QualifierHunter => "qualifier-hunter",
            Self::PotAware => "pot-aware",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Conservative => "secure 1 and 4 first, then keep sixes (fives/fours near the end)",
            Self::Middle => "on the opening roll, bank sixes alongside qualifiers",
            Self::KeepMax => "always keep the single highest die",
            Self::QualifierHunter => "keep missing qualifiers, otherwise the highest die",
            Self::PotAware => "middle when the pot is rich or chasing last, else conservative",
        }
    }

    /// Instantiate the strategy behind this identifier.
    #[must_use]
    pub fn build(self) -> Box<dyn CompoundStrategy> {
        match self {
            Self::Conservative => Box::new(Always(Conservative)),
            Self::Middle => Box::new(Always(Middle)),
            Self::KeepMax => Box::new(Always(KeepMax)),
            Self::QualifierHunter => Box::new(Always(QualifierHunter)),
            Self::PotAware => Box::new(PotAware::default()),
        }
    }

    /// The simple policy behind this identifier, when it has exactly one.
    #[must_use]
    pub fn simple(self) -> Option<Box<dyn SimpleStrategy>> {
        match self {
            Self::Conservative => Some(Box::new(Conservative)),
            Self::Middle => Some(Box::new(Middle)),
            Self::KeepMax => Some(Box::new(KeepMax)),
            Self::QualifierHunter => Some(Box::new(QualifierHunter)),
            Self::PotAware => None,
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a strategy name does not match any built-in strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown strategy `{0}`")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyId {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::all()
            .into_iter()
            .find(|id| id.label() == wanted)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
