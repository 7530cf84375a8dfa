//! Roster, turn order and the round loop.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::config::GameConfig;
use crate::constants::TIE_LABEL;
use crate::dice::{DiceRoller, SeededDice};
use crate::error::GameError;
use crate::naming::NameGenerator;
use crate::player::{Player, PlayerOptions, Stake};
use crate::score::Score;
use crate::strategy::{CompoundStrategy, RoundContext};

/// Winner of a round: a single seat, or a tie at the top.
///
/// The seat is the winner's roster index; names are display-only and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player { seat: usize, name: String },
    Tie,
}

impl Winner {
    #[must_use]
    pub const fn is_tie(&self) -> bool {
        matches!(self, Self::Tie)
    }

    #[must_use]
    pub const fn seat(&self) -> Option<usize> {
        match self {
            Self::Player { seat, .. } => Some(*seat),
            Self::Tie => None,
        }
    }

    #[must_use]
    pub fn player(&self) -> Option<&str> {
        match self {
            Self::Player { name, .. } => Some(name),
            Self::Tie => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player { name, .. } => f.write_str(name),
            Self::Tie => f.write_str(TIE_LABEL),
        }
    }
}

/// Immutable log entry describing one resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based index of the round.
    pub round: u32,
    /// Pot at stake when the round resolved, including any carried chips.
    pub pot: Stake,
    pub winner: Winner,
    /// Final scores in roster order.
    pub scores: Vec<Score>,
}

/// A Midnight game: a fixed roster playing a configured number of rounds.
#[derive(Debug)]
pub struct Game<R = SeededDice> {
    config: GameConfig,
    seed: Option<u64>,
    dice: R,
    players: Vec<Player>,
    names: NameGenerator,
    round_first_player: usize,
    current_pot: Stake,
    rounds_played: u32,
    started: bool,
    log: Vec<RoundRecord>,
}

impl Game<SeededDice> {
    /// Build a game rolling seeded dice. Without a configured seed one is drawn
    /// from entropy and reported by [`Game::seed`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` when the configuration is invalid.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let dice = config
            .seed
            .map_or_else(SeededDice::from_entropy, SeededDice::new);
        let seed = Some(dice.seed());
        let mut game = Self::with_roller(config, dice)?;
        game.seed = seed;
        Ok(game)
    }
}

impl<R: DiceRoller> Game<R> {
    /// Build a game around an injected dice roller.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` when the configuration is invalid.
    pub fn with_roller(config: GameConfig, dice: R) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            seed: config.seed,
            config,
            dice,
            players: Vec::new(),
            names: NameGenerator::new(),
            round_first_player: 0,
            current_pot: 0,
            rounds_played: 0,
            started: false,
            log: Vec::new(),
        })
    }

    /// Seat a new player, auto-naming it when no name is given.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RosterLocked` once the first round has been played.
    pub fn add_player(
        &mut self,
        strategy: Box<dyn CompoundStrategy>,
        options: PlayerOptions,
    ) -> Result<&Player, GameError> {
        self.ensure_open()?;
        let name = options.name.unwrap_or_else(|| self.names.next_name());
        self.push_player(Player::new(name, strategy, options.initial_stake))?;
        Ok(&self.players[self.players.len() - 1])
    }

    /// Seat an already constructed player.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RosterLocked` once the first round has been played.
    pub fn push_player(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure_open()?;
        log::debug!("seating {} ({})", player.name(), player.strategy_name());
        self.players.push(player);
        Ok(())
    }

    /// Restart auto-naming at `Player1`.
    pub fn reset_name_counter(&mut self) {
        self.names.reset();
    }

    fn ensure_open(&self) -> Result<(), GameError> {
        if self.started {
            Err(GameError::RosterLocked)
        } else {
            Ok(())
        }
    }

    /// Play every remaining configured round.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoPlayers` for an empty roster, or any error raised
    /// while playing a round.
    pub fn play(&mut self) -> Result<(), GameError> {
        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        while !self.is_finished() {
            self.play_round()?;
        }
        Ok(())
    }

    /// Play a single round and append its record to the log.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoPlayers` for an empty roster, or the first error
    /// raised by a player's turn. A failed round is rolled back: the pot, the
    /// stakes and the roster lock are restored and nothing is logged. Dice
    /// already drawn stay consumed.
    pub fn play_round(&mut self) -> Result<&RoundRecord, GameError> {
        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        let was_started = self.started;
        let pot_before = self.current_pot;
        let stakes_before = self.stakes();
        self.started = true;

        let order = self.turn_order();
        let leading_score = match self.play_turns(&order) {
            Ok(score) => score,
            Err(err) => {
                log::warn!("round {} aborted: {err}", self.rounds_played);
                self.current_pot = pot_before;
                for (player, stake) in self.players.iter_mut().zip(stakes_before) {
                    player.credit(stake - player.stake());
                }
                self.started = was_started;
                return Err(err);
            }
        };

        let top_scorers: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&idx| self.players[idx].score() == leading_score)
            .collect();
        let pot = self.current_pot;
        let winner = match top_scorers.as_slice() {
            [sole] => {
                let player = &mut self.players[*sole];
                player.credit(pot);
                self.current_pot = 0;
                Winner::Player {
                    seat: *sole,
                    name: player.name().to_string(),
                }
            }
            _ => Winner::Tie,
        };
        if let Some(&last) = top_scorers.last() {
            self.round_first_player = last;
        }

        log::debug!(
            "round {} resolved: winner {winner}, pot {pot}, top score {leading_score}",
            self.rounds_played
        );
        self.log.push(RoundRecord {
            round: self.rounds_played,
            pot,
            winner,
            scores: self.scores(),
        });
        self.rounds_played += 1;
        Ok(&self.log[self.log.len() - 1])
    }

    /// Play every turn in `order`, feeding wagers into the pot. Returns the
    /// round's leading score.
    fn play_turns(&mut self, order: &[usize]) -> Result<Score, GameError> {
        let n = order.len();
        let mut leading_score = Score::ZERO;
        for (position, &idx) in order.iter().enumerate() {
            let ctx = RoundContext {
                leading_score,
                players_remaining: n - (position + 1),
                current_pot: self.current_pot,
            };
            let player = &mut self.players[idx];
            let turn = player.play(&ctx, &mut self.dice, self.config.wager_rule, self.config.ante)?;
            self.current_pot += turn.wager;
            leading_score = leading_score.max(turn.score);
        }
        Ok(leading_score)
    }

    /// Roster indices in this round's playing order.
    #[must_use]
    pub fn turn_order(&self) -> Vec<usize> {
        let n = self.players.len();
        (0..n).map(|i| (self.round_first_player + i) % n).collect()
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.rounds_played >= self.config.rounds
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the dice stream, when the game owns a seeded roller.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub const fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub const fn round_first_player(&self) -> usize {
        self.round_first_player
    }

    /// Chips in the pot of the round in progress (carried over after a tie).
    #[must_use]
    pub const fn current_pot(&self) -> Stake {
        self.current_pot
    }

    /// Current scores in roster order.
    #[must_use]
    pub fn scores(&self) -> Vec<Score> {
        self.players.iter().map(Player::score).collect()
    }

    #[must_use]
    pub fn top_score(&self) -> Score {
        self.players
            .iter()
            .map(Player::score)
            .max()
            .unwrap_or(Score::ZERO)
    }

    #[must_use]
    pub fn stakes(&self) -> Vec<Stake> {
        self.players.iter().map(Player::stake).collect()
    }

    #[must_use]
    pub fn relative_stakes(&self) -> Vec<Stake> {
        self.players.iter().map(Player::relative_stake).collect()
    }

    /// Every chip at the table: stakes plus the pot in flight.
    #[must_use]
    pub fn total_chips(&self) -> Stake {
        self.stakes().iter().sum::<Stake>() + self.current_pot
    }

    #[must_use]
    pub fn round_log(&self) -> &[RoundRecord] {
        &self.log
    }

    /// Stable hash of the round log. Two games with the same seed and roster
    /// produce the same fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for record in &self.log {
            hasher.write_u32(record.round);
            hasher.write_i64(record.pot);
            match record.winner.seat() {
                Some(seat) => {
                    hasher.write_u8(1);
                    hasher.write_usize(seat);
                }
                None => hasher.write_u8(0),
            }
            for score in &record.scores {
                hasher.write_i32(score.value());
            }
        }
        hasher.finish()
    }

    /// Score history of the player at `player_index`, one entry per round.
    #[must_use]
    pub fn player_scores(&self, player_index: usize) -> Vec<Score> {
        self.log
            .iter()
            .filter_map(|record| record.scores.get(player_index).copied())
            .collect()
    }

    /// Score history of every player, in roster order.
    #[must_use]
    pub fn all_scores(&self) -> Vec<(String, Vec<Score>)> {
        self.players
            .iter()
            .enumerate()
            .map(|(idx, player)| (player.name().to_string(), self.player_scores(idx)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Dice, Die, ScriptedDice};
    use crate::strategy::{Always, Conservative, KeepMax, SimpleStrategy, StrategyId};

    fn conservative() -> Box<dyn CompoundStrategy> {
        Box::new(Always(Conservative))
    }

    #[test]
    fn play_without_players_fails() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.play(), Err(GameError::NoPlayers));
        assert!(matches!(game.play_round(), Err(GameError::NoPlayers)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            Game::new(GameConfig::new(0)),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn entropy_seed_is_recorded() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert!(game.seed().is_some());
        let game = Game::new(GameConfig::default().with_seed(5)).unwrap();
        assert_eq!(game.seed(), Some(5));
    }

    #[test]
    fn turn_order_rotates_from_first_player() {
        let mut game = Game::new(GameConfig::default().with_seed(1)).unwrap();
        for _ in 0..3 {
            game.add_player(conservative(), PlayerOptions::default()).unwrap();
        }
        game.round_first_player = 1;
        assert_eq!(game.turn_order(), vec![1, 2, 0]);
    }

    #[test]
    fn auto_names_come_from_the_game() {
        let mut game = Game::new(GameConfig::default().with_seed(1)).unwrap();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        game.add_player(conservative(), PlayerOptions::named("John")).unwrap();
        game.reset_name_counter();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        let names: Vec<&str> = game.players().iter().map(Player::name).collect();
        assert_eq!(names, vec!["Player1", "John", "Player1"]);
    }

    #[test]
    fn roster_locks_after_first_round() {
        let mut game = Game::new(GameConfig::new(2).with_seed(3)).unwrap();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        game.play_round().unwrap();
        assert!(matches!(
            game.add_player(conservative(), PlayerOptions::default()),
            Err(GameError::RosterLocked)
        ));
    }

    #[test]
    fn sole_winner_takes_the_pot_and_starts_next() {
        // Player1 rolls 1,4,6,6,6,6 (24); Player2 rolls 2,2,2,2,2,2 then keeps one die at a time.
        let script: Vec<Die> = [1, 4, 6, 6, 6, 6]
            .into_iter()
            .chain(std::iter::repeat_n(2, 21))
            .collect();
        let mut game = Game::with_roller(GameConfig::new(1), ScriptedDice::new(script)).unwrap();
        game.add_player(conservative(), PlayerOptions::default().with_initial_stake(10))
            .unwrap();
        game.add_player(
            Box::new(Always(KeepMax)),
            PlayerOptions::default().with_initial_stake(10),
        )
        .unwrap();

        let record = game.play_round().unwrap().clone();
        assert_eq!(record.round, 0);
        assert_eq!(record.pot, 3);
        assert_eq!(
            record.winner,
            Winner::Player {
                seat: 0,
                name: "Player1".to_string()
            }
        );
        assert_eq!(record.scores, vec![Score::MAX, Score::ZERO]);
        assert_eq!(game.stakes(), vec![11, 9]);
        assert_eq!(game.current_pot(), 0);
        assert_eq!(game.round_first_player(), 0);
        assert_eq!(game.rounds_played(), 1);
        assert!(game.is_finished());
    }

    #[test]
    fn tie_carries_the_pot_and_last_tied_player_starts() {
        // Neither player qualifies: both score zero.
        let script = std::iter::repeat_n(2, 42);
        let mut game = Game::with_roller(GameConfig::new(2), ScriptedDice::new(script)).unwrap();
        for _ in 0..2 {
            game.add_player(Box::new(Always(KeepMax)), PlayerOptions::default())
                .unwrap();
        }
        let record = game.play_round().unwrap().clone();
        assert_eq!(record.winner, Winner::Tie);
        assert_eq!(record.pot, 2);
        assert_eq!(game.current_pot(), 2);
        assert_eq!(game.round_first_player(), 1);
        assert_eq!(game.turn_order(), vec![1, 0]);
        assert_eq!(game.relative_stakes(), vec![-1, -1]);
    }

    fn qualifying_hand() -> [Die; 6] {
        [1, 4, 6, 6, 6, 6]
    }

    #[test]
    fn rotated_tie_hands_the_start_to_last_tied_in_turn_order() {
        let blank = || std::iter::repeat_n(2, 21);
        let script: Vec<Die> = blank()
            .chain(blank())
            .chain(qualifying_hand())
            .chain(qualifying_hand())
            .chain(qualifying_hand())
            .chain(blank())
            .collect();
        let mut game = Game::with_roller(GameConfig::new(2), ScriptedDice::new(script)).unwrap();
        for _ in 0..3 {
            game.add_player(conservative(), PlayerOptions::default()).unwrap();
        }

        let first = game.play_round().unwrap().clone();
        assert_eq!(first.winner.seat(), Some(2));
        assert_eq!(game.round_first_player(), 2);
        assert_eq!(game.turn_order(), vec![2, 0, 1]);

        let second = game.play_round().unwrap().clone();
        assert!(second.winner.is_tie());
        assert_eq!(second.scores, vec![Score::MAX, Score::ZERO, Score::MAX]);
        assert_eq!(game.round_first_player(), 0);
        assert_eq!(game.current_pot(), 5);
    }

    #[test]
    fn wins_are_credited_by_seat_when_names_repeat() {
        let script: Vec<Die> = qualifying_hand()
            .into_iter()
            .chain(std::iter::repeat_n(2, 21))
            .collect();
        let mut game = Game::with_roller(GameConfig::new(1), ScriptedDice::new(script)).unwrap();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        game.reset_name_counter();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        game.play().unwrap();

        assert_eq!(game.players()[0].name(), game.players()[1].name());
        assert_eq!(game.round_log()[0].winner.seat(), Some(0));
        let stats = crate::stats::GameStats::from_game(&game);
        let wins: Vec<usize> = stats.players.iter().map(|p| p.wins).collect();
        assert_eq!(wins, vec![1, 0]);
        assert_eq!(wins.iter().sum::<usize>() + stats.ties, stats.rounds);
    }

    #[test]
    fn a_player_named_tie_still_wins_after_a_json_round_trip() {
        let script: Vec<Die> = qualifying_hand()
            .into_iter()
            .chain(std::iter::repeat_n(2, 21))
            .collect();
        let mut game = Game::with_roller(GameConfig::new(1), ScriptedDice::new(script)).unwrap();
        game.add_player(conservative(), PlayerOptions::named(TIE_LABEL))
            .unwrap();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        let record = game.play_round().unwrap().clone();
        assert_eq!(record.winner.to_string(), TIE_LABEL);

        let json = serde_json::to_string(&record).unwrap();
        let back: RoundRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(!back.winner.is_tie());
        assert_eq!(back.winner.player(), Some(TIE_LABEL));
        assert_ne!(
            serde_json::to_value(&back.winner).unwrap(),
            serde_json::to_value(Winner::Tie).unwrap()
        );
    }

    #[test]
    fn failed_turn_rolls_the_round_back() {
        #[derive(Debug)]
        struct KeepsNothing;
        impl CompoundStrategy for KeepsNothing {
            fn name(&self) -> &'static str {
                "keeps-nothing"
            }
            fn decide(&self, _kept: &[Die], _rolled: &[Die], _ctx: &RoundContext) -> Dice {
                Dice::new()
            }
        }

        let mut game =
            Game::with_roller(GameConfig::new(1), ScriptedDice::new(qualifying_hand())).unwrap();
        game.add_player(conservative(), PlayerOptions::default().with_initial_stake(10))
            .unwrap();
        game.add_player(
            Box::new(KeepsNothing),
            PlayerOptions::default().with_initial_stake(10),
        )
        .unwrap();

        let err = game.play_round().unwrap_err();
        assert!(matches!(
            err,
            GameError::Strategy {
                strategy: "keeps-nothing",
                ..
            }
        ));
        assert_eq!(game.current_pot(), 0);
        assert_eq!(game.stakes(), vec![10, 10]);
        assert_eq!(game.total_chips(), 20);
        assert!(game.round_log().is_empty());
        assert_eq!(game.rounds_played(), 0);
        assert!(game.add_player(conservative(), PlayerOptions::default()).is_ok());
    }

    #[test]
    fn later_players_see_the_pot_and_leading_score() {
        #[derive(Debug)]
        struct Spy(std::sync::Mutex<Vec<RoundContext>>);
        impl CompoundStrategy for Spy {
            fn name(&self) -> &'static str {
                "spy"
            }
            fn decide(&self, kept: &[Die], rolled: &[Die], ctx: &RoundContext) -> Dice {
                if kept.is_empty() {
                    self.0.lock().unwrap().push(*ctx);
                }
                Conservative.decide(kept, rolled)
            }
        }
        let spy = std::sync::Arc::new(Spy(std::sync::Mutex::new(Vec::new())));

        #[derive(Debug)]
        struct Shared(std::sync::Arc<Spy>);
        impl CompoundStrategy for Shared {
            fn name(&self) -> &'static str {
                self.0.name()
            }
            fn decide(&self, kept: &[Die], rolled: &[Die], ctx: &RoundContext) -> Dice {
                self.0.decide(kept, rolled, ctx)
            }
        }

        let script: Vec<Die> = [1, 4, 6, 6, 6, 5, 5, 5]
            .into_iter()
            .chain(std::iter::repeat_n(3, 40))
            .collect();
        let mut game = Game::with_roller(GameConfig::new(1), ScriptedDice::new(script)).unwrap();
        game.add_player(conservative(), PlayerOptions::default()).unwrap();
        game.add_player(Box::new(Shared(spy.clone())), PlayerOptions::default())
            .unwrap();
        game.play().unwrap();

        let seen = spy.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].players_remaining, 0);
        assert_eq!(seen[0].current_pot, 2);
        assert_eq!(seen[0].leading_score.value(), 23);
    }

    #[test]
    fn score_history_is_grouped_per_player() {
        let mut game = Game::new(GameConfig::new(25).with_seed(77)).unwrap();
        for id in [StrategyId::Conservative, StrategyId::Middle] {
            game.add_player(id.build(), PlayerOptions::default()).unwrap();
        }
        game.play().unwrap();
        assert_eq!(game.round_log().len(), 25);
        let all = game.all_scores();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, "Player1");
        assert_eq!(all[1].1.len(), 25);
        assert_eq!(all[0].1, game.player_scores(0));
        assert!(game.round_first_player() < game.players().len());
    }

    #[test]
    fn fingerprint_tracks_the_round_log() {
        let run = |seed| {
            let mut game = Game::new(GameConfig::new(40).with_seed(seed)).unwrap();
            for _ in 0..3 {
                game.add_player(StrategyId::PotAware.build(), PlayerOptions::default())
                    .unwrap();
            }
            game.play().unwrap();
            game.fingerprint()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }
}
