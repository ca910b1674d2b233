use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use elo_season::game::{EloGame, Site};
use elo_season::monte_carlo::{run_trial, MonteCarloConfig, MonteCarloEngine};
use elo_season::rating::Rating;
use elo_season::win_prob::{gaussian_sigma, inverse_erf, sample_spread, win_probability};

const SCHEDULE_JSON: &str = include_str!("../tests/fixtures/schedule.json");
const RATINGS_JSON: &str = include_str!("../tests/fixtures/ratings.json");

fn create_engine(simulations: usize, experiments: usize) -> MonteCarloEngine {
    let config = MonteCarloConfig {
        simulations,
        experiments,
        seed: Some(42),
        parallel: true,
    };
    MonteCarloEngine::from_json(SCHEDULE_JSON, RATINGS_JSON, config).unwrap()
}

fn bench_probability_model(c: &mut Criterion) {
    c.bench_function("win_probability", |b| b.iter(|| win_probability(black_box(269))));
    c.bench_function("inverse_erf", |b| b.iter(|| inverse_erf(black_box(-0.65)).unwrap()));

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mean = 10.76;
    let sigma = gaussian_sigma(mean, win_probability(269)).unwrap();
    c.bench_function("sample_spread", |b| {
        b.iter(|| sample_spread(black_box(mean), black_box(sigma), &mut rng).unwrap())
    });
}

fn bench_single_game(c: &mut Criterion) {
    let home = Rating::with_rating("NYG", 1744).unwrap();
    let away = Rating::with_rating("LA", 1540).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("simulated_game_update", |b| {
        b.iter(|| {
            let (mut h, mut a) = (home.clone(), away.clone());
            let mut game = EloGame::new(&mut h, &mut a, Site::HomeField);
            game.update_teams(&mut rng).unwrap()
        })
    });
}

fn bench_season(c: &mut Criterion) {
    let engine = create_engine(1, 1);
    let mut seed = 0u64;

    c.bench_function("season_single_trial", |b| {
        b.iter(|| {
            seed += 1;
            run_trial(engine.schedule(), engine.standings(), black_box(seed)).unwrap()
        })
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(10);
    group.bench_function("1000_trials", |b| {
        b.iter(|| {
            let mut engine = create_engine(1000, 1);
            engine.simulate(1000).unwrap();
            engine.report().unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_probability_model,
    bench_single_game,
    bench_season,
    bench_monte_carlo,
);
criterion_main!(benches);
