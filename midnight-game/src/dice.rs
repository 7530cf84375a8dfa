//! Dice primitives, qualification and scoring, and the injected roll capability.
use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::constants::{DICE_STREAM_TAG, DIE_FACES, N_DICE, QUALIFIERS};
use crate::score::{Score, ScoreError};

/// Face value of a single die, in `1..=6`.
pub type Die = u8;

/// Dice stored inline; a hand never holds more than six.
pub type Dice = SmallVec<[Die; N_DICE]>;

/// True when every qualifier appears at least once in `dice`.
#[must_use]
pub fn qualifies(dice: &[Die]) -> bool {
    QUALIFIERS.iter().all(|q| dice.contains(q))
}

/// Qualifiers not yet present in `dice`, in canonical order.
#[must_use]
pub fn missing_qualifiers(dice: &[Die]) -> Dice {
    QUALIFIERS
        .iter()
        .copied()
        .filter(|q| !dice.contains(q))
        .collect()
}

/// Score a finished hand.
///
/// Non-qualifying hands score zero. Qualifying hands score the sum of all dice
/// minus one copy of each qualifier; extra copies count at face value.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidScore`] when the result leaves the valid range,
/// which only happens for malformed hands (e.g. more than six dice).
pub fn score_dice(dice: &[Die]) -> Result<Score, ScoreError> {
    if !qualifies(dice) {
        return Ok(Score::ZERO);
    }
    let total: i32 = dice.iter().map(|&d| i32::from(d)).sum();
    let required: i32 = QUALIFIERS.iter().map(|&q| i32::from(q)).sum();
    Score::new(total - required)
}

/// Remove one copy of `value` from `dice`, returning whether it was present.
pub(crate) fn take_one(dice: &mut Dice, value: Die) -> bool {
    if let Some(pos) = dice.iter().position(|&d| d == value) {
        dice.remove(pos);
        true
    } else {
        false
    }
}

/// Source of die rolls. Each returned die is uniform in `1..=6`.
pub trait DiceRoller {
    /// Roll exactly `n` dice.
    fn roll(&mut self, n: usize) -> Dice;
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll(&mut self, n: usize) -> Dice {
        (**self).roll(n)
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll(&mut self, n: usize) -> Dice {
        (**self).roll(n)
    }
}

/// Deterministic dice stream derived from a user-visible seed.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha20Rng,
    draws: u64,
}

impl SeededDice {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, DICE_STREAM_TAG)),
            draws: 0,
        }
    }

    /// Seed from fresh entropy. The chosen seed stays available via [`Self::seed`]
    /// so the run can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of individual dice drawn from this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn roll_one(&mut self) -> Die {
        self.draws = self.draws.saturating_add(1);
        self.rng.gen_range(1..=DIE_FACES)
    }
}

impl DiceRoller for SeededDice {
    fn roll(&mut self, n: usize) -> Dice {
        (0..n).map(|_| self.roll_one()).collect()
    }
}

/// Replays a fixed script of dice, then falls back to a seeded stream.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    script: VecDeque<Die>,
    fallback: SeededDice,
}

impl ScriptedDice {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Die>) -> Self {
        Self::with_fallback(script, SeededDice::new(0))
    }

    #[must_use]
    pub fn with_fallback(script: impl IntoIterator<Item = Die>, fallback: SeededDice) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
        }
    }

    /// Dice still waiting in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, n: usize) -> Dice {
        let mut out = Dice::new();
        while out.len() < n {
            match self.script.pop_front() {
                Some(die) => out.push(die),
                None => out.extend(self.fallback.roll(n - out.len())),
            }
        }
        out
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("HMAC accepts any key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
