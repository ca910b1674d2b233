/// Teams in the league
pub const NUM_TEAMS: usize = 32;

/// Regular-season games per team
pub const GAMES_PER_TEAM: u32 = 16;

/// Scheduling weeks in a season (one bye per team)
pub const NUM_WEEKS: usize = 17;

/// Exclusive upper bound on a recorded final score
pub const MAX_SCORE: i64 = 100;

/// Rating points awarded to the home side when computing the rating gap
pub const HOME_FIELD_ADVANTAGE: i32 = 65;

/// Rating points per scoring point of expected margin
pub const ELO_POINTS_PER_POINT: f64 = 25.0;

/// Rating gap scale of the logistic win-probability curve
pub const LOGISTIC_SCALE: f64 = 400.0;

/// K-factor of the rating exchange
pub const K_FACTOR: f64 = 20.0;

/// Damping of the exchange by the pre-game rating difference
pub const RATING_DIFF_DAMPING: f64 = 2200.0;

/// Fitted margin standard deviation for an even (50/50) matchup
pub const EVEN_MATCHUP_SIGMA: f64 = 11.087;

/// Upper bound on Gaussian draws before a spread is declared degenerate
pub const MAX_SPREAD_DRAWS: usize = 10_000;

/// Prefix marking the listed home team as playing at a neutral site
pub const NEUTRAL_SITE_MARKER: char = '*';

/// Sentinel key aggregating "any team finished undefeated"
pub const ANY_TEAM: &str = "ANY";

/// Two-sided coverages rendered in the undefeated report
pub const REPORT_COVERAGES: [f64; 3] = [0.50, 0.68, 0.95];

/// Default trials per Monte Carlo batch
pub const DEFAULT_SIMULATIONS: usize = 2000;

/// Default number of Monte Carlo batches
pub const DEFAULT_EXPERIMENTS: usize = 250;
