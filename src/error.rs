//! Error taxonomy.
//!
//! Every error here is a structural or arithmetic inconsistency; nothing is
//! retried. Validation errors surface while loading inputs, domain and game
//! errors inside a single matchup, and simulation errors after a full season.

use thiserror::Error;

/// Malformed schedule, record or rating-table input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("record {wins}-{losses}-{ties} out of range (each in 0..=16, at most 16 games)")]
    RecordOutOfRange { wins: i64, losses: i64, ties: i64 },

    #[error("invalid team name {0:?}: expected 2-3 uppercase letters")]
    InvalidTeamName(String),

    #[error("expected {expected} weeks, found {found}")]
    WeekCount { expected: usize, found: usize },

    #[error("week {week}: expected {expected} games, found {found}")]
    GameCount {
        week: usize,
        expected: usize,
        found: usize,
    },

    #[error("week {week}: team {team} appears more than once")]
    DuplicateTeam { week: usize, team: String },

    #[error("week {week}: score {score} for {team} outside 0..100")]
    ScoreOutOfRange { week: usize, team: String, score: i64 },

    #[error("expected {expected} teams, found {found}")]
    TeamCount { expected: usize, found: usize },

    #[error("team {0} is not in the rating table")]
    UnknownTeam(String),

    #[error("team {0} has no starting rating")]
    MissingRating(String),

    #[error("team {0} is listed more than once")]
    DuplicateRating(String),

    #[error("starting rating for {team} must be [rating, wins, losses, ties?], found {len} values")]
    MalformedStartingRating { team: String, len: usize },

    #[error("starting rating {value} for {team} does not fit a rating")]
    RatingOutOfRange { team: String, value: i64 },
}

/// Argument outside the mathematical domain of the probability model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("inverse_erf argument {0} outside [-1, 1]")]
    InverseErf(f64),

    #[error("probability {0} outside (0, 1)")]
    Probability(f64),

    #[error("percentile {0} outside (0, 1)")]
    Percentile(f64),

    #[error("invalid spread distribution: mean {mean}, sigma {sigma}")]
    Sigma { mean: f64, sigma: f64 },

    #[error("no non-zero spread drawn from mean {mean}, sigma {sigma} after {draws} draws")]
    DegenerateSpread { mean: f64, sigma: f64, draws: usize },

    #[error("win percentage undefined with no games played")]
    NoGamesPlayed,
}

/// Inconsistent use of a single game.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("winner is {winner} but must be one of {home} or {away}")]
    UnknownWinner {
        winner: String,
        home: String,
        away: String,
    },

    #[error("{winner} is reported as the winner by a margin of zero")]
    ZeroMargin { winner: String },

    #[error("ratings for {away} @ {home} were already updated")]
    AlreadyUpdated { home: String, away: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Post-season invariant violation. Signals an update defect, never bad data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("expected {expected} teams in the standings, found {found}")]
    TeamCount { expected: usize, found: usize },

    #[error("{wins} wins, {losses} losses")]
    UnbalancedResults { wins: u32, losses: u32 },

    #[error("{wins} wins, {losses} losses, {ties} ties")]
    TotalGames { wins: u32, losses: u32, ties: u32 },

    #[error("{team} finished {wins}-{losses}-{ties}")]
    TeamGames {
        team: String,
        wins: u32,
        losses: u32,
        ties: u32,
    },
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("week {week}, {away} @ {home}: {source}")]
    Game {
        week: usize,
        home: String,
        away: String,
        #[source]
        source: GameError,
    },

    #[error("season failed verification: {0}")]
    Simulation(#[from] SimulationError),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
