//! Elo Season - Monte Carlo season forecasting from ELO ratings.
//!
//! Replays the played part of a 32-team, 17-week schedule, samples the rest
//! from an ELO win-probability model, and aggregates many simulated seasons
//! into undefeated-probability percentiles. Optional Python bindings via PyO3
//! (feature `python`).

pub mod constants;
pub mod error;
pub mod game;
pub mod monte_carlo;
pub mod rating;
pub mod record;
pub mod schedule;
pub mod season;
pub mod standings;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use constants::{ANY_TEAM, GAMES_PER_TEAM, HOME_FIELD_ADVANTAGE, K_FACTOR, NUM_TEAMS, NUM_WEEKS};
pub use error::{DomainError, Error, GameError, Result, SimulationError, ValidationError};
pub use game::{rating_exchange, Decision, EloGame, GameResult, GameState, OutcomeSource, Side, Site};
pub use monte_carlo::{
    run_trial, MonteCarloConfig, MonteCarloEngine, PercentileBand, ReportRow, SeasonSummary, UndefeatedAggregate,
    UndefeatedReport,
};
pub use rating::Rating;
pub use record::RatingRecord;
pub use schedule::{FinalScore, GameInput, Schedule, ScheduleInput, ScheduledGame, Week};
pub use season::{verify_standings, SeasonSimulator};
pub use standings::{RatingTable, StartingRating};
pub use win_prob::{gaussian_sigma, inverse_erf, sample_spread, win_probability};
