//! Standalone strategy evaluation: score distributions and turn traces.
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SCORE, N_DICE};
use crate::dice::{Dice, DiceRoller, Die, score_dice};
use crate::error::GameError;
use crate::numbers::{mean_i64, ratio};
use crate::score::Score;
use crate::strategy::{SimpleStrategy, check_keep};

/// One strategy invocation within a traced turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionStep {
    pub kept: Dice,
    pub rolled: Dice,
    pub decided: Dice,
}

fn validate_start(start_dice: &[Die]) -> Result<(), GameError> {
    let actual = start_dice.len();
    if actual > N_DICE {
        return Err(GameError::InvalidStart {
            expected: N_DICE,
            actual,
        });
    }
    Ok(())
}

/// Keep rolling with `strategy` from `kept` until six dice are held, calling
/// `on_step` after every decision.
fn finish_hand(
    strategy: &dyn SimpleStrategy,
    kept: &mut Dice,
    mut first_roll: Option<Dice>,
    roller: &mut dyn DiceRoller,
    mut on_step: impl FnMut(DecisionStep),
) -> Result<(), GameError> {
    while kept.len() < N_DICE {
        let rolled = match first_roll.take() {
            Some(roll) => roll,
            None => roller.roll(N_DICE - kept.len()),
        };
        let decided = strategy.decide(&kept[..], &rolled);
        check_keep(&rolled, &decided).map_err(|source| GameError::Strategy {
            strategy: strategy.name(),
            source,
        })?;
        if kept.len() + decided.len() > N_DICE {
            return Err(GameError::HandOverflow {
                kept: kept.len(),
                adding: decided.len(),
            });
        }
        let previous = kept.clone();
        kept.extend_from_slice(&decided);
        on_step(DecisionStep {
            kept: previous,
            rolled,
            decided,
        });
    }
    Ok(())
}

/// Play `strategy` alone `samples` times, each from `start_dice`, and collect
/// the final scores.
///
/// # Errors
///
/// Returns `GameError::InvalidStart` when `start_dice` holds more than six
/// dice, or `GameError::Strategy` if the strategy breaks the keep contract.
pub fn sample_scores(
    strategy: &dyn SimpleStrategy,
    samples: usize,
    start_dice: &[Die],
    roller: &mut dyn DiceRoller,
) -> Result<Vec<Score>, GameError> {
    validate_start(start_dice)?;
    let mut scores = Vec::with_capacity(samples);
    for _ in 0..samples {
        let mut kept: Dice = start_dice.iter().copied().collect();
        finish_hand(strategy, &mut kept, None, roller, |_| {})?;
        scores.push(score_dice(&kept)?);
    }
    Ok(scores)
}

/// Record every decision of a single turn. When `first_roll` is given it is
/// used instead of rolling, and together with `start_dice` it must make up
/// exactly six dice.
///
/// # Errors
///
/// Returns `GameError::InvalidStart` for a start that does not add up, or
/// `GameError::Strategy` if the strategy breaks the keep contract.
pub fn trace_turn(
    strategy: &dyn SimpleStrategy,
    start_dice: &[Die],
    first_roll: Option<&[Die]>,
    roller: &mut dyn DiceRoller,
) -> Result<Vec<DecisionStep>, GameError> {
    if let Some(roll) = first_roll {
        let actual = start_dice.len() + roll.len();
        if actual != N_DICE {
            return Err(GameError::InvalidStart {
                expected: N_DICE,
                actual,
            });
        }
    } else {
        validate_start(start_dice)?;
    }

    let mut kept: Dice = start_dice.iter().copied().collect();
    let mut steps = Vec::new();
    finish_hand(
        strategy,
        &mut kept,
        first_roll.map(|roll| roll.iter().copied().collect()),
        roller,
        |step| steps.push(step),
    )?;
    Ok(steps)
}

/// Distribution of final scores for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistogram {
    /// `counts[s]` is the number of hands scoring `s`.
    pub counts: Vec<usize>,
    pub samples: usize,
}

impl ScoreHistogram {
    #[must_use]
    pub fn from_scores(scores: &[Score]) -> Self {
        let mut counts = vec![0; usize::try_from(MAX_SCORE).unwrap_or(0) + 1];
        for score in scores {
            if let Some(slot) = usize::try_from(score.value())
                .ok()
                .and_then(|idx| counts.get_mut(idx))
            {
                *slot += 1;
            }
        }
        Self {
            counts,
            samples: scores.len(),
        }
    }

    #[must_use]
    pub fn count(&self, score: Score) -> usize {
        usize::try_from(score.value())
            .ok()
            .and_then(|idx| self.counts.get(idx).copied())
            .unwrap_or(0)
    }

    /// Share of samples that qualified (scored above zero).
    #[must_use]
    pub fn qualification_rate(&self) -> f64 {
        ratio(self.samples.saturating_sub(self.count(Score::ZERO)), self.samples)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        mean_i64(self.iter().flat_map(|(score, count)| {
            std::iter::repeat_n(i64::from(score.value()), count)
        }))
    }

    /// Non-empty buckets in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = (Score, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .filter_map(|(idx, &count)| {
                let score = Score::new(i32::try_from(idx).ok()?).ok()?;
                Some((score, count))
            })
    }
}
