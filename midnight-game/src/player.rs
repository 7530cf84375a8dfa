//! A seat at the table: strategy, kept dice, wager and stake.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::WagerRule;
use crate::constants::{INF_STAKE, N_DICE};
use crate::dice::{Dice, DiceRoller, Die, qualifies, score_dice};
use crate::error::GameError;
use crate::score::Score;
use crate::strategy::{CompoundStrategy, RoundContext, check_keep};

/// Chip balance.
pub type Stake = i64;

/// Where a player stands within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// No dice kept yet.
    Idle,
    /// Some, but not all, dice kept.
    Rolling,
    /// Six dice kept; wager final.
    Settled,
}

/// Optional per-player settings supplied when joining a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial_stake: Option<Stake>,
}

impl PlayerOptions {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            initial_stake: None,
        }
    }

    #[must_use]
    pub const fn with_initial_stake(mut self, initial_stake: Stake) -> Self {
        self.initial_stake = Some(initial_stake);
        self
    }
}

/// Outcome of one completed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    /// Strategy invocations needed to commit all six dice.
    pub decisions: usize,
    pub score: Score,
    pub qualified: bool,
    pub wager: Stake,
}

#[derive(Debug)]
pub struct Player {
    name: String,
    strategy: Box<dyn CompoundStrategy>,
    kept: Dice,
    score: Score,
    wager: Stake,
    stake: Stake,
    initial_stake: Stake,
}

impl Player {
    /// Create a player. Without an explicit stake the player starts with
    /// [`INF_STAKE`] so it cannot go broke during a simulation.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        strategy: Box<dyn CompoundStrategy>,
        initial_stake: Option<Stake>,
    ) -> Self {
        let initial_stake = initial_stake.unwrap_or(INF_STAKE);
        Self {
            name: name.into(),
            strategy,
            kept: Dice::new(),
            score: Score::ZERO,
            wager: 0,
            stake: initial_stake,
            initial_stake,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    #[must_use]
    pub fn kept_dice(&self) -> &[Die] {
        &self.kept
    }

    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn qualifies(&self) -> bool {
        qualifies(&self.kept)
    }

    /// Wager of the current (or last) round.
    #[must_use]
    pub const fn wager(&self) -> Stake {
        self.wager
    }

    #[must_use]
    pub const fn stake(&self) -> Stake {
        self.stake
    }

    #[must_use]
    pub const fn initial_stake(&self) -> Stake {
        self.initial_stake
    }

    /// Net chips won or lost since the player joined.
    #[must_use]
    pub const fn relative_stake(&self) -> Stake {
        self.stake - self.initial_stake
    }

    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.kept.len() == N_DICE
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match self.kept.len() {
            0 => TurnPhase::Idle,
            n if n < N_DICE => TurnPhase::Rolling,
            _ => TurnPhase::Settled,
        }
    }

    /// Add winnings to the stake.
    pub fn credit(&mut self, amount: Stake) {
        self.stake += amount;
    }

    /// Append dice to the kept hand.
    ///
    /// # Errors
    ///
    /// Returns `GameError::HandOverflow` if the hand would exceed six dice.
    pub fn keep_dice(&mut self, dice: &[Die]) -> Result<(), GameError> {
        if self.kept.len() + dice.len() > N_DICE {
            return Err(GameError::HandOverflow {
                kept: self.kept.len(),
                adding: dice.len(),
            });
        }
        self.kept.extend_from_slice(dice);
        self.score = score_dice(&self.kept)?;
        Ok(())
    }

    /// Clear the kept hand ahead of a new round.
    ///
    /// # Errors
    ///
    /// Propagates a scoring failure; an empty hand always scores zero.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.kept.clear();
        self.score = score_dice(&self.kept)?;
        debug_assert!(self.score.is_zero(), "reset must clear the score");
        Ok(())
    }

    /// Play a full turn: roll the dice not yet kept, let the strategy choose,
    /// and repeat until six dice are committed. The settled wager is then
    /// deducted from the stake.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Strategy` when the strategy keeps nothing or keeps a
    /// die it was not offered.
    pub fn play(
        &mut self,
        ctx: &RoundContext,
        dice: &mut dyn DiceRoller,
        rule: WagerRule,
        ante: Stake,
    ) -> Result<TurnSummary, GameError> {
        self.reset()?;
        self.wager = rule.opening_wager(ante);

        let mut decisions = 0;
        while !self.has_finished() {
            let rolled = dice.roll(N_DICE - self.kept.len());
            let keep = self.strategy.decide(&self.kept, &rolled, ctx);
            check_keep(&rolled, &keep).map_err(|source| GameError::Strategy {
                strategy: self.strategy.name(),
                source,
            })?;
            log::trace!(
                "{} kept {:?} from {:?} (holding {:?})",
                self.name,
                keep.as_slice(),
                rolled.as_slice(),
                self.kept.as_slice()
            );
            self.keep_dice(&keep)?;
            decisions += 1;
        }

        let qualified = self.qualifies();
        self.wager = rule.settled_wager(ante, qualified);
        self.stake -= self.wager;

        Ok(TurnSummary {
            decisions,
            score: self.score,
            qualified,
            wager: self.wager,
        })
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player(name={}, stake={}, score={})",
            self.name, self.stake, self.score
        )
    }
}
