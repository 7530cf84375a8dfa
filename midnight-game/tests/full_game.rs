use midnight_game::{
    Always, Game, GameConfig, GameError, GameStats, KeepMax, PlayerOptions, QualifierHunter,
    ScriptedDice, StrategyId, WagerRule, Winner,
};

const STAKE: i64 = 1_000;

fn seeded_game(rounds: u32, seed: u64, rule: WagerRule, strategies: &[StrategyId]) -> Game {
    let config = GameConfig::new(rounds).with_seed(seed).with_wager_rule(rule);
    let mut game = Game::new(config).unwrap();
    for id in strategies {
        game.add_player(id.build(), PlayerOptions::default().with_initial_stake(STAKE))
            .unwrap();
    }
    game
}

#[test]
fn two_player_round_settles_the_pot() {
    let mut game = Game::new(GameConfig::new(1).with_seed(4242)).unwrap();
    game.add_player(
        Box::new(Always(KeepMax)),
        PlayerOptions::named("Max").with_initial_stake(STAKE),
    )
    .unwrap();
    game.add_player(
        Box::new(Always(QualifierHunter)),
        PlayerOptions::named("Hunter").with_initial_stake(STAKE),
    )
    .unwrap();

    let record = game.play_round().unwrap().clone();
    let wagers: Vec<i64> = game.players().iter().map(|p| p.wager()).collect();
    assert_eq!(record.pot, wagers.iter().sum::<i64>());
    assert!(game.players().iter().all(|p| p.kept_dice().len() == 6));

    match &record.winner {
        Winner::Player { seat: idx, name } => {
            let idx = *idx;
            assert_eq!(game.players()[idx].name(), name);
            assert_eq!(game.current_pot(), 0);
            assert_eq!(game.stakes()[idx], STAKE - wagers[idx] + record.pot);
            assert_eq!(game.stakes()[1 - idx], STAKE - wagers[1 - idx]);
            assert_eq!(game.round_first_player(), idx);
        }
        Winner::Tie => {
            assert_eq!(game.current_pot(), record.pot);
            assert_eq!(game.stakes(), vec![STAKE - wagers[0], STAKE - wagers[1]]);
        }
    }
}

#[test]
fn chips_are_conserved_under_both_wager_rules() {
    let roster = [
        StrategyId::Conservative,
        StrategyId::Middle,
        StrategyId::PotAware,
    ];
    for rule in [WagerRule::QualifierAddsAnte, WagerRule::QualifierSavesAnte] {
        let mut game = seeded_game(300, 7, rule, &roster);
        let total = STAKE * 3;
        while !game.is_finished() {
            game.play_round().unwrap();
            assert_eq!(game.total_chips(), total, "{rule:?}");
        }
        let relative: i64 = game.relative_stakes().iter().sum();
        assert_eq!(relative + game.current_pot(), 0);
    }
}

#[test]
fn same_seed_replays_the_same_game() {
    let roster = [StrategyId::Conservative, StrategyId::KeepMax];
    let mut a = seeded_game(200, 1337, WagerRule::default(), &roster);
    let mut b = seeded_game(200, 1337, WagerRule::default(), &roster);
    a.play().unwrap();
    b.play().unwrap();
    assert_eq!(a.round_log(), b.round_log());
    assert_eq!(a.stakes(), b.stakes());
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn full_game_produces_consistent_stats() {
    let roster = [
        StrategyId::Conservative,
        StrategyId::Middle,
        StrategyId::QualifierHunter,
    ];
    let mut game = seeded_game(500, 99, WagerRule::default(), &roster);
    game.play().unwrap();
    assert!(game.is_finished());
    assert_eq!(game.rounds_played(), 500);

    let stats = GameStats::from_game(&game);
    assert_eq!(stats.rounds, 500);
    let wins: usize = stats.players.iter().map(|p| p.wins).sum();
    assert_eq!(wins + stats.ties, 500);
    assert!(stats.players.iter().all(|p| p.mean_score <= 24.0));
    assert_eq!(stats.unclaimed_pot, game.current_pot());

    for (round, record) in game.round_log().iter().enumerate() {
        assert_eq!(record.round as usize, round);
        assert_eq!(record.scores.len(), 3);
    }
    assert!(game.round_first_player() < 3);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["rounds"], 500);
}

#[test]
fn tied_rounds_grow_the_next_pot() {
    // Nobody ever qualifies, so every round ties and the pot keeps growing.
    let dice = ScriptedDice::new(std::iter::repeat_n(3, 21 * 2 * 3));
    let mut game = Game::with_roller(GameConfig::new(3), dice).unwrap();
    for _ in 0..2 {
        game.add_player(Box::new(Always(KeepMax)), PlayerOptions::default())
            .unwrap();
    }
    game.play().unwrap();
    let pots: Vec<i64> = game.round_log().iter().map(|r| r.pot).collect();
    assert_eq!(pots, vec![2, 4, 6]);
    assert!(game.round_log().iter().all(|r| r.winner == Winner::Tie));
    assert_eq!(game.current_pot(), 6);
}

#[test]
fn roster_errors_surface() {
    let mut game = Game::new(GameConfig::new(2).with_seed(1)).unwrap();
    assert_eq!(game.play(), Err(GameError::NoPlayers));

    game.add_player(StrategyId::Conservative.build(), PlayerOptions::default())
        .unwrap();
    game.play().unwrap();
    let err = game
        .add_player(StrategyId::Middle.build(), PlayerOptions::default())
        .unwrap_err();
    assert_eq!(err, GameError::RosterLocked);
}
