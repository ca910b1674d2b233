use elo_season::{
    verify_standings, EloGame, Error, MonteCarloConfig, MonteCarloEngine, Rating, RatingRecord, RatingTable, Schedule,
    SeasonSimulator, SimulationError, Site, ANY_TEAM,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SCHEDULE_JSON: &str = include_str!("fixtures/schedule.json");
const RATINGS_JSON: &str = include_str!("fixtures/ratings.json");

fn load() -> (Schedule, RatingTable) {
    let schedule = Schedule::from_json_str(SCHEDULE_JSON).unwrap();
    let table = RatingTable::from_json_str(RATINGS_JSON, &schedule).unwrap();
    (schedule, table)
}

#[test]
fn test_upset_replay_moves_25_points() {
    let mut atl = Rating::new("ATL", 1541, RatingRecord::new(6, 1, 0).unwrap()).unwrap();
    let mut tb = Rating::new("TB", 1351, RatingRecord::new(2, 4, 0).unwrap()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let mut game = EloGame::known(&mut atl, &mut tb, Site::HomeField, 20, 23);
    assert!(game.home_win_probability() > 0.812 && game.home_win_probability() < 0.813);
    assert!(game.away_win_probability() > 0.187 && game.away_win_probability() < 0.188);
    let result = game.update_teams(&mut rng).unwrap();

    assert_eq!(result.winner(), Some("TB"));
    assert_eq!(result.margin(), 3);
    assert_eq!(result.points_exchanged, 25);
    assert_eq!(tb.rating, 1376);
    assert_eq!(atl.rating, 1516);
    assert_eq!(tb.rating + atl.rating, 2892);
}

#[test]
fn test_neutral_site_gap() {
    let mut home = Rating::with_rating("NYG", 1744).unwrap();
    let mut away = Rating::with_rating("LA", 1540).unwrap();
    assert_eq!(EloGame::new(&mut home, &mut away, Site::HomeField).elo_margin(), 269);
    assert_eq!(EloGame::new(&mut home, &mut away, Site::Neutral).elo_margin(), 204);
}

#[test]
fn test_seasons_balance_and_detect_corruption() {
    let (schedule, table) = load();
    let mut rng = ChaCha8Rng::seed_from_u64(2016);

    for _ in 0..50 {
        let mut season = SeasonSimulator::new(&schedule, table.clone());
        season.simulate_season(&mut rng).unwrap();
        let (wins, losses, ties) = season.standings().totals();
        assert_eq!(wins, losses);
        assert_eq!(wins + losses + ties, 512);
    }

    let mut season = SeasonSimulator::new(&schedule, table);
    season.simulate_season(&mut rng).unwrap();
    let mut standings = season.into_standings();
    standings.get_mut("SEA").unwrap().record.add_win();
    assert!(matches!(
        verify_standings(&standings),
        Err(SimulationError::UnbalancedResults { .. })
    ));
}

#[test]
fn test_starting_record_overflow_fails_the_season() {
    // A carried-over record on top of a full schedule breaks the 16-game invariant.
    let (schedule, mut table) = load();
    table.get_mut("NE").unwrap().record = RatingRecord::new(1, 0, 0).unwrap();
    let mut season = SeasonSimulator::new(&schedule, table);
    let err = season.simulate_season(&mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, Error::Simulation(_)));
}

#[test]
fn test_two_thousand_trials_are_reproducible() {
    let config = MonteCarloConfig {
        simulations: 2000,
        experiments: 1,
        seed: Some(1234),
        parallel: true,
    };
    let mut first = MonteCarloEngine::from_json(SCHEDULE_JSON, RATINGS_JSON, config.clone()).unwrap();
    let mut second = MonteCarloEngine::from_json(SCHEDULE_JSON, RATINGS_JSON, config).unwrap();
    first.simulate(2000).unwrap();
    second.simulate(2000).unwrap();

    let first_report = first.report().unwrap();
    assert_eq!(first_report, second.report().unwrap());
    assert_eq!(first_report.to_string(), second.report().unwrap().to_string());
}

#[test]
fn test_unseeded_any_probability_is_bounded() {
    let config = MonteCarloConfig {
        simulations: 1000,
        experiments: 4,
        seed: None,
        parallel: true,
    };
    let mut engine = MonteCarloEngine::from_json(SCHEDULE_JSON, RATINGS_JSON, config).unwrap();
    let any = engine.percentile(ANY_TEAM, 0.5).unwrap();
    assert!(any >= 0.0);

    let aggregate = engine.aggregate().unwrap();
    let any_total: usize = aggregate.counts(ANY_TEAM).unwrap().iter().sum();
    let best_team_total = engine
        .schedule()
        .teams()
        .iter()
        .map(|t| aggregate.counts(t).unwrap().iter().sum::<usize>())
        .max()
        .unwrap();
    assert!(any_total <= 32 * best_team_total);
    assert!(any_total <= 4 * 1000);
    assert!(engine.probability_at_least(1).unwrap() <= 100.0);
}
