//! Validated round score.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::MAX_SCORE;

/// Raised when a score falls outside `[0, MAX_SCORE]`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("score {value} outside the valid range 0..={max}")]
    InvalidScore { value: i32, max: i32 },
}

/// Score of a finished six-dice hand. Always within `[0, MAX_SCORE]`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Score(i32);

impl Score {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(MAX_SCORE);

    /// Construct a score, rejecting values outside the valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidScore`] when `value` is negative or above
    /// [`MAX_SCORE`].
    pub const fn new(value: i32) -> Result<Self, ScoreError> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(ScoreError::InvalidScore {
                value,
                max: MAX_SCORE,
            })
        }
    }

    #[must_use]
    pub const fn is_valid(value: i32) -> bool {
        value >= 0 && value <= MAX_SCORE
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i32> for Score {
    type Error = ScoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i32 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inclusive_bounds() {
        assert_eq!(Score::new(0).unwrap().value(), 0);
        assert_eq!(Score::new(24).unwrap().value(), 24);
        assert_eq!(Score::MAX.value(), 24);
    }

    #[test]
    fn every_value_in_range_is_valid() {
        for value in 0..=MAX_SCORE {
            assert!(Score::new(value).is_ok(), "{value} should be valid");
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Score::new(-1),
            Err(ScoreError::InvalidScore { value: -1, max: 24 })
        );
        assert_eq!(
            Score::try_from(25),
            Err(ScoreError::InvalidScore { value: 25, max: 24 })
        );
    }

    #[test]
    fn serde_rejects_invalid_scores() {
        let ok: Score = serde_json::from_str("17").unwrap();
        assert_eq!(ok.value(), 17);
        assert!(serde_json::from_str::<Score>("30").is_err());
        assert_eq!(serde_json::to_string(&Score::MAX).unwrap(), "24");
    }
}
