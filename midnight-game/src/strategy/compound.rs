//! Context-aware keep policies.
use crate::constants::POT_AWARE_DEFAULT_THRESHOLD;
use crate::dice::{Dice, Die};
use crate::score::Score;
use crate::strategy::{CompoundStrategy, Conservative, Middle, RoundContext, SimpleStrategy};

/// Switches to [`Middle`] when the pot is worth chasing or when acting last
/// against a posted score, and plays [`Conservative`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotAware {
    pot_threshold: i64,
}

impl PotAware {
    #[must_use]
    pub const fn new(pot_threshold: i64) -> Self {
        Self { pot_threshold }
    }

    #[must_use]
    pub const fn pot_threshold(&self) -> i64 {
        self.pot_threshold
    }

    fn prefers_middle(&self, ctx: &RoundContext) -> bool {
        let rich_pot = ctx.current_pot >= self.pot_threshold;
        let chasing_last = ctx.players_remaining == 0 && ctx.leading_score > Score::ZERO;
        rich_pot || chasing_last
    }
}

impl Default for PotAware {
    fn default() -> Self {
        Self::new(POT_AWARE_DEFAULT_THRESHOLD)
    }
}

impl CompoundStrategy for PotAware {
    fn name(&self) -> &'static str {
        "pot-aware"
    }

    fn decide(&self, kept: &[Die], rolled: &[Die], ctx: &RoundContext) -> Dice {
        if self.prefers_middle(ctx) {
            log::trace!("pot-aware: middle (pot {})", ctx.current_pot);
            Middle.decide(kept, rolled)
        } else {
            Conservative.decide(kept, rolled)
        }
    }
}
