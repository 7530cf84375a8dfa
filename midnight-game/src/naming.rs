//! Auto-assigned player names.
use crate::constants::PLAYER_NAME_PREFIX;

/// Hands out `Player1`, `Player2`, ... for players created without a name.
///
/// Owned by a [`crate::Game`] so independent games never share a counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameGenerator {
    issued: u32,
}

impl NameGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Next name in the sequence.
    pub fn next_name(&mut self) -> String {
        self.issued = self.issued.saturating_add(1);
        format!("{PLAYER_NAME_PREFIX}{}", self.issued)
    }

    /// Names issued so far.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }

    /// Restart the sequence at `Player1`.
    pub fn reset(&mut self) {
        self.issued = 0;
    }
}
