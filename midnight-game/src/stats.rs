//! Aggregate statistics over a game's round log.
use serde::{Deserialize, Serialize};

use crate::dice::DiceRoller;
use crate::game::{Game, RoundRecord, Winner};
use crate::numbers::{mean_i64, ratio};
use crate::player::{Player, Stake};

/// Seat details needed to summarise a player independently of a live game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub name: String,
    pub strategy: String,
    pub initial_stake: Stake,
    pub stake: Stake,
}

impl From<&Player> for Seat {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            strategy: player.strategy_name().to_string(),
            initial_stake: player.initial_stake(),
            stake: player.stake(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub strategy: String,
    pub rounds: usize,
    pub wins: usize,
    pub win_rate: f64,
    /// Share of rounds finished with both qualifiers (a nonzero score).
    pub qualification_rate: f64,
    pub mean_score: f64,
    pub relative_stake: Stake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub rounds: usize,
    pub players: Vec<PlayerSummary>,
    pub ties: usize,
    pub tie_rate: f64,
    pub mean_pot: f64,
    pub max_pot: Stake,
    /// Pot still waiting on the table after the last round (a trailing tie).
    pub unclaimed_pot: Stake,
}

impl GameStats {
    #[must_use]
    pub fn from_game<R: DiceRoller>(game: &Game<R>) -> Self {
        let seats: Vec<Seat> = game.players().iter().map(Seat::from).collect();
        let mut stats = Self::from_records(&seats, game.round_log());
        stats.unclaimed_pot = game.current_pot();
        stats
    }

    /// Summarise `records`, whose score vectors follow the order of `seats`.
    #[must_use]
    pub fn from_records(seats: &[Seat], records: &[RoundRecord]) -> Self {
        let rounds = records.len();
        let players = seats
            .iter()
            .enumerate()
            .map(|(idx, seat)| {
                let scores: Vec<i64> = records
                    .iter()
                    .filter_map(|r| r.scores.get(idx))
                    .map(|s| i64::from(s.value()))
                    .collect();
                let wins = records
                    .iter()
                    .filter(|r| r.winner.seat() == Some(idx))
                    .count();
                let qualified = scores.iter().filter(|&&s| s > 0).count();
                PlayerSummary {
                    name: seat.name.clone(),
                    strategy: seat.strategy.clone(),
                    rounds: scores.len(),
                    wins,
                    win_rate: ratio(wins, rounds),
                    qualification_rate: ratio(qualified, scores.len()),
                    mean_score: mean_i64(scores.iter().copied()),
                    relative_stake: seat.stake - seat.initial_stake,
                }
            })
            .collect();

        let ties = records.iter().filter(|r| r.winner.is_tie()).count();
        Self {
            rounds,
            players,
            ties,
            tie_rate: ratio(ties, rounds),
            mean_pot: mean_i64(records.iter().map(|r| r.pot)),
            max_pot: records.iter().map(|r| r.pot).max().unwrap_or(0),
            unclaimed_pot: 0,
        }
    }

    /// Outcome shares keyed by winner label, ties included.
    #[must_use]
    pub fn win_rates(&self) -> Vec<(String, f64)> {
        self.players
            .iter()
            .map(|p| (p.name.clone(), p.win_rate))
            .chain(std::iter::once((Winner::Tie.to_string(), self.tie_rate)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    fn seat(name: &str, stake: Stake) -> Seat {
        Seat {
            name: name.to_string(),
            strategy: "conservative".to_string(),
            initial_stake: 100,
            stake,
        }
    }

    fn won_by(seat: usize, name: &str) -> Winner {
        Winner::Player {
            seat,
            name: name.to_string(),
        }
    }

    fn record(round: u32, pot: Stake, winner: Winner, scores: [i32; 2]) -> RoundRecord {
        RoundRecord {
            round,
            pot,
            winner,
            scores: scores.iter().map(|&s| Score::new(s).unwrap()).collect(),
        }
    }

    #[test]
    fn summaries_count_wins_ties_and_qualification() {
        let seats = [seat("Ann", 103), seat("Bob", 95)];
        let records = [
            record(0, 3, won_by(0, "Ann"), [20, 0]),
            record(1, 2, Winner::Tie, [0, 0]),
            record(2, 6, won_by(0, "Ann"), [12, 10]),
            record(3, 4, won_by(1, "Bob"), [0, 8]),
        ];
        let stats = GameStats::from_records(&seats, &records);

        assert_eq!(stats.rounds, 4);
        assert_eq!(stats.ties, 1);
        assert!((stats.tie_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(stats.max_pot, 6);
        assert!((stats.mean_pot - 3.75).abs() < f64::EPSILON);

        let ann = &stats.players[0];
        assert_eq!(ann.wins, 2);
        assert!((ann.win_rate - 0.5).abs() < f64::EPSILON);
        assert!((ann.qualification_rate - 0.5).abs() < f64::EPSILON);
        assert!((ann.mean_score - 8.0).abs() < f64::EPSILON);
        assert_eq!(ann.relative_stake, 3);
        assert_eq!(stats.players[1].relative_stake, -5);

        let total: f64 = stats.win_rates().iter().map(|(_, rate)| rate).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seats_sharing_a_name_keep_separate_win_counts() {
        let seats = [seat("Player1", 102), seat("Player1", 98)];
        let records = [
            record(0, 2, won_by(0, "Player1"), [20, 0]),
            record(1, 2, won_by(0, "Player1"), [18, 0]),
        ];
        let stats = GameStats::from_records(&seats, &records);
        assert_eq!(stats.players[0].wins, 2);
        assert_eq!(stats.players[1].wins, 0);
        let wins: usize = stats.players.iter().map(|p| p.wins).sum();
        assert_eq!(wins + stats.ties, stats.rounds);
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let stats = GameStats::from_records(&[seat("Ann", 100)], &[]);
        assert_eq!(stats.rounds, 0);
        assert_eq!(stats.players[0].wins, 0);
        assert!(stats.players[0].win_rate.abs() < f64::EPSILON);
        assert_eq!(stats.max_pot, 0);
    }
}
