use anyhow::{Context, Result, bail};
use midnight_game::{
    Game, GameConfig, GameStats, PlayerOptions, ScoreHistogram, SeededDice, Stake, StrategyId,
    WagerRule, sample_scores,
};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::logic::seeds::SeedInfo;

/// Parameters shared by every seeded game of a run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub rounds: u32,
    pub players: usize,
    /// Strategies cycled across seats.
    pub strategies: Vec<StrategyId>,
    pub initial_stake: Stake,
    pub wager_rule: WagerRule,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(rounds: u32, players: usize, strategies: Vec<StrategyId>) -> Self {
        Self {
            rounds,
            players,
            strategies,
            initial_stake: 1_000,
            wager_rule: WagerRule::default(),
        }
    }

    #[must_use]
    pub const fn with_initial_stake(mut self, initial_stake: Stake) -> Self {
        self.initial_stake = initial_stake;
        self
    }

    #[must_use]
    pub const fn with_wager_rule(mut self, wager_rule: WagerRule) -> Self {
        self.wager_rule = wager_rule;
        self
    }

    /// Strategy for each seat, cycling through the configured list.
    #[must_use]
    pub fn seat_strategies(&self) -> Vec<StrategyId> {
        self.strategies
            .iter()
            .copied()
            .cycle()
            .take(self.players)
            .collect()
    }
}

/// Outcome of one seeded game.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub seed: SeedInfo,
    pub fingerprint: String,
    #[serde(skip)]
    pub duration: Duration,
    pub stats: GameStats,
}

/// Parse strategy labels into identifiers.
pub fn parse_strategies(tokens: &[String]) -> Result<Vec<StrategyId>> {
    if tokens.is_empty() {
        bail!("at least one strategy is required");
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<StrategyId>()
                .with_context(|| format!("invalid --strategies entry `{token}`"))
        })
        .collect()
}

/// Play a full game for a single seed.
pub fn run_seed(config: &SimulationConfig, seed: &SeedInfo) -> Result<SimulationRun> {
    if config.players == 0 {
        bail!("--players must be at least 1");
    }
    let start = Instant::now();
    let game_config = GameConfig::new(config.rounds)
        .with_seed(seed.seed)
        .with_wager_rule(config.wager_rule);
    let mut game = Game::new(game_config).context("invalid game configuration")?;
    for id in config.seat_strategies() {
        game.add_player(
            id.build(),
            PlayerOptions::default().with_initial_stake(config.initial_stake),
        )?;
    }
    game.play()
        .with_context(|| format!("game with seed {} failed", seed.seed))?;
    log::debug!(
        "seed {} finished {} rounds, pot left {}",
        seed.seed,
        game.rounds_played(),
        game.current_pot()
    );

    Ok(SimulationRun {
        seed: seed.clone(),
        fingerprint: format!("{:016x}", game.fingerprint()),
        duration: start.elapsed(),
        stats: GameStats::from_game(&game),
    })
}

/// Play one game per seed, sequentially.
pub fn run_simulations(config: &SimulationConfig, seeds: &[SeedInfo]) -> Result<Vec<SimulationRun>> {
    seeds.iter().map(|seed| run_seed(config, seed)).collect()
}

/// Standalone score distribution of one simple strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySample {
    pub strategy: StrategyId,
    pub histogram: ScoreHistogram,
}

/// Sample every strategy that can play alone. Context-aware strategies are
/// skipped because a lone hand has no round to read.
pub fn run_sampling(samples: usize, seed: u64) -> Result<Vec<StrategySample>> {
    let mut dice = SeededDice::new(seed);
    let mut out = Vec::new();
    for id in StrategyId::all() {
        let Some(strategy) = id.simple() else {
            log::debug!("skipping {id}: needs round context");
            continue;
        };
        let scores = sample_scores(strategy.as_ref(), samples, &[], &mut dice)
            .with_context(|| format!("sampling {id}"))?;
        out.push(StrategySample {
            strategy: id,
            histogram: ScoreHistogram::from_scores(&scores),
        });
    }
    Ok(out)
}
