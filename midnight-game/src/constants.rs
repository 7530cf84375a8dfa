//! Centralized rule and tuning constants for the Midnight engine.
//!
//! These values define the canonical rules of the game. Keeping them together
//! means the rules can only be adjusted via reviewed code changes.

use crate::dice::Die;

// Dice ---------------------------------------------------------------------
/// Number of dice every player must commit per turn.
pub const N_DICE: usize = 6;
/// Number of faces on a die.
pub const DIE_FACES: Die = 6;
/// Values a player must keep at least once in order to score.
pub const QUALIFIERS: [Die; 2] = [1, 4];

// Scoring ------------------------------------------------------------------
/// Highest attainable score: six-point faces on every non-qualifier die.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const MAX_SCORE: i32 = DIE_FACES as i32 * (N_DICE - QUALIFIERS.len()) as i32;

// Qualified keep thresholds ------------------------------------------------
/// Once qualified, a 5 is only kept with this many dice (or fewer) left.
pub(crate) const KEEP_FIVE_MAX_REMAINING: usize = 2;
/// Once qualified, a 4 is only kept when it is the very last die.
pub(crate) const KEEP_FOUR_REMAINING: usize = 1;

// Economy ------------------------------------------------------------------
/// Base wager unit.
pub const ANTE: i64 = 1;
/// Default stake, large enough that nobody goes bankrupt in a simulation.
pub const INF_STAKE: i64 = 100_000_000;
/// Pot size at which the pot-aware strategy starts taking risks.
pub const POT_AWARE_DEFAULT_THRESHOLD: i64 = 6;

// Game ---------------------------------------------------------------------
/// Rounds played when the configuration does not say otherwise.
pub const DEFAULT_ROUNDS: u32 = 1;
/// Label recorded as the winner of a tied round.
pub const TIE_LABEL: &str = "Tie";
/// Prefix of auto-assigned player names.
pub const PLAYER_NAME_PREFIX: &str = "Player";

// Randomness ---------------------------------------------------------------
/// Domain tag separating the dice stream from any other stream of a seed.
pub(crate) const DICE_STREAM_TAG: &[u8] = b"midnight-dice";
