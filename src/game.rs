//! Single-game outcome model.
//!
//! A game is composed from two independent choices: where it is played
//! ([`Site`], which fixes the rating gap) and where its result comes from
//! ([`OutcomeSource`], sampled or known). The game then moves through
//! `Unsimulated -> Simulated -> Updated`; known results start out simulated.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ELO_POINTS_PER_POINT, HOME_FIELD_ADVANTAGE, K_FACTOR, RATING_DIFF_DAMPING};
use crate::error::GameError;
use crate::rating::Rating;
use crate::win_prob::{gaussian_sigma, sample_spread, win_probability};

/// Venue of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    /// Listed home team gets the home-field bonus
    #[default]
    HomeField,
    /// Neither side gets a bonus
    Neutral,
}

impl Site {
    /// Signed rating gap from the listed home team's point of view.
    pub fn rating_gap(self, home_rating: i32, away_rating: i32) -> i32 {
        match self {
            Site::HomeField => HOME_FIELD_ADVANTAGE + home_rating - away_rating,
            Site::Neutral => home_rating - away_rating,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Site::Neutral
    }
}

/// Where the result of a game comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeSource {
    /// Sampled from the rating-gap model
    Simulated,
    /// Replayed from a final score
    Known { home_score: u32, away_score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Decided outcome of one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// `margin` is always at least 1
    Win { winner: Side, margin: u32 },
    Tie,
}

impl Decision {
    /// Decision implied by a final score.
    pub fn from_scores(home_score: u32, away_score: u32) -> Decision {
        if home_score == away_score {
            return Decision::Tie;
        }
        let winner = if home_score > away_score { Side::Home } else { Side::Away };
        Decision::Win {
            winner,
            margin: home_score.abs_diff(away_score),
        }
    }

    /// Decision implied by a signed spread (positive favors home).
    fn from_spread(spread: i32) -> Decision {
        match spread {
            0 => Decision::Tie,
            s => Decision::Win {
                winner: if s > 0 { Side::Home } else { Side::Away },
                margin: s.unsigned_abs(),
            },
        }
    }

    pub fn margin(&self) -> u32 {
        match self {
            Decision::Win { margin, .. } => *margin,
            Decision::Tie => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Unsimulated,
    Simulated(Decision),
    Updated(Decision),
}

/// Outcome of one applied game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub home: String,
    pub away: String,
    pub decision: Decision,
    /// Rating points moved from loser to winner (0 for a tie)
    pub points_exchanged: i32,
    pub site: Site,
}

impl GameResult {
    pub fn winner(&self) -> Option<&str> {
        match self.decision {
            Decision::Win { winner: Side::Home, .. } => Some(&self.home),
            Decision::Win { winner: Side::Away, .. } => Some(&self.away),
            Decision::Tie => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        match self.decision {
            Decision::Win { winner: Side::Home, .. } => Some(&self.away),
            Decision::Win { winner: Side::Away, .. } => Some(&self.home),
            Decision::Tie => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.decision == Decision::Tie
    }

    pub fn margin(&self) -> u32 {
        self.decision.margin()
    }
}

/// Rating points a winner takes from a loser.
///
/// `K * (1 - p) * ln(margin + 1) / (1 + (winner - loser) / 2200)`, where `p` is
/// the probability the winner had going in. Upsets and blowouts move more.
pub fn rating_exchange(winner_prob: f64, margin: u32, winner_rating: i32, loser_rating: i32) -> f64 {
    let points = K_FACTOR * (1.0 - winner_prob) * (f64::from(margin) + 1.0).ln();
    points / (1.0 + f64::from(winner_rating - loser_rating) / RATING_DIFF_DAMPING)
}

/// One matchup between two teams of a rating table.
#[derive(Debug)]
pub struct EloGame<'a> {
    home: &'a mut Rating,
    away: &'a mut Rating,
    site: Site,
    source: OutcomeSource,
    state: GameState,
}

impl<'a> EloGame<'a> {
    /// Create a game whose result will be sampled.
    pub fn new(home: &'a mut Rating, away: &'a mut Rating, site: Site) -> Self {
        EloGame {
            home,
            away,
            site,
            source: OutcomeSource::Simulated,
            state: GameState::Unsimulated,
        }
    }

    /// Create a game replaying a final score. It starts out simulated.
    pub fn known(home: &'a mut Rating, away: &'a mut Rating, site: Site, home_score: u32, away_score: u32) -> Self {
        EloGame {
            home,
            away,
            site,
            source: OutcomeSource::Known { home_score, away_score },
            state: GameState::Simulated(Decision::from_scores(home_score, away_score)),
        }
    }

    /// Create a game from a result reported as a winning team name and margin.
    ///
    /// # Errors
    /// `GameError::UnknownWinner` if `winner` is neither side of the game,
    /// `GameError::ZeroMargin` if `margin` is 0. Ties go through `known`.
    pub fn with_claimed_winner(
        home: &'a mut Rating,
        away: &'a mut Rating,
        site: Site,
        winner: &str,
        margin: u32,
    ) -> Result<Self, GameError> {
        let (home_score, away_score) = if winner == home.name() {
            (margin, 0)
        } else if winner == away.name() {
            (0, margin)
        } else {
            return Err(GameError::UnknownWinner {
                winner: winner.to_string(),
                home: home.name().to_string(),
                away: away.name().to_string(),
            });
        };
        if margin == 0 {
            return Err(GameError::ZeroMargin {
                winner: winner.to_string(),
            });
        }
        Ok(Self::known(home, away, site, home_score, away_score))
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn source(&self) -> OutcomeSource {
        self.source
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn home(&self) -> &Rating {
        &*self.home
    }

    pub fn away(&self) -> &Rating {
        &*self.away
    }

    /// Rating gap from the home side's point of view.
    pub fn elo_margin(&self) -> i32 {
        let margin = self.site.rating_gap(self.home.rating, self.away.rating);
        debug!("{} @ {}: ELO margin = {}", self.away.name(), self.home.name(), margin);
        margin
    }

    /// Expected home margin of victory in points.
    pub fn point_margin(&self) -> f64 {
        f64::from(self.elo_margin()) / ELO_POINTS_PER_POINT
    }

    pub fn home_win_probability(&self) -> f64 {
        win_probability(self.elo_margin())
    }

    pub fn away_win_probability(&self) -> f64 {
        1.0 - self.home_win_probability()
    }

    /// Decided outcome, once simulated.
    pub fn decision(&self) -> Option<Decision> {
        match self.state {
            GameState::Unsimulated => None,
            GameState::Simulated(d) | GameState::Updated(d) => Some(d),
        }
    }

    pub fn winner(&self) -> Option<&Rating> {
        match self.decision()? {
            Decision::Win { winner, .. } => Some(self.side(winner)),
            Decision::Tie => None,
        }
    }

    pub fn loser(&self) -> Option<&Rating> {
        match self.decision()? {
            Decision::Win { winner, .. } => Some(self.side(winner.other())),
            Decision::Tie => None,
        }
    }

    /// Margin of victory, 0 before simulation or for a tie.
    pub fn spread(&self) -> u32 {
        self.decision().map_or(0, |d| d.margin())
    }

    fn side(&self, side: Side) -> &Rating {
        match side {
            Side::Home => &*self.home,
            Side::Away => &*self.away,
        }
    }

    fn side_probability(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_win_probability(),
            Side::Away => self.away_win_probability(),
        }
    }

    /// Sample the outcome if it is not decided yet; a no-op otherwise.
    ///
    /// The spread is drawn from a Gaussian whose mean is the point margin and
    /// whose mass above zero is the home win probability. Zero draws are
    /// rejected, so simulated games never tie.
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Decision, GameError> {
        if let Some(decision) = self.decision() {
            debug!("Winner already known: {:?}", decision);
            return Ok(decision);
        }

        let mean = self.point_margin();
        let prob = self.home_win_probability();
        let sigma = gaussian_sigma(mean, prob)?;
        let spread = sample_spread(mean, sigma, rng)?;
        let decision = Decision::from_spread(spread);
        debug!(
            "{} @ {}: point margin {:.2}, home win probability {:.4}, sigma {:.3}, spread {}",
            self.away.name(),
            self.home.name(),
            mean,
            prob,
            sigma,
            spread
        );

        self.state = GameState::Simulated(decision);
        Ok(decision)
    }

    /// Apply the result to both teams' ratings and records.
    ///
    /// Simulates first if needed. May be called once per game.
    ///
    /// # Errors
    /// `GameError::AlreadyUpdated` on a second call.
    pub fn update_teams<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameResult, GameError> {
        if let GameState::Updated(_) = self.state {
            return Err(GameError::AlreadyUpdated {
                home: self.home.name().to_string(),
                away: self.away.name().to_string(),
            });
        }
        let decision = self.simulate(rng)?;

        let points_exchanged = match decision {
            Decision::Win { winner, margin } => {
                let prob = self.side_probability(winner);
                let (winner_rating, loser_rating) = match winner {
                    Side::Home => (self.home.rating, self.away.rating),
                    Side::Away => (self.away.rating, self.home.rating),
                };
                let raw = rating_exchange(prob, margin, winner_rating, loser_rating);
                let points = raw.round() as i32;
                debug!(
                    "Updating with points = {} * (1 - {:.4}) * ln({} + 1) / (1 + {}/{}) = {:.3}",
                    K_FACTOR,
                    prob,
                    margin,
                    winner_rating - loser_rating,
                    RATING_DIFF_DAMPING,
                    raw
                );

                let (w, l) = match winner {
                    Side::Home => (&mut *self.home, &mut *self.away),
                    Side::Away => (&mut *self.away, &mut *self.home),
                };
                w.update_win(points);
                l.update_loss(points);
                points
            }
            Decision::Tie => {
                self.home.update_tie();
                self.away.update_tie();
                0
            }
        };

        self.state = GameState::Updated(decision);
        Ok(GameResult {
            home: self.home.name().to_string(),
            away: self.away.name().to_string(),
            decision,
            points_exchanged,
            site: self.site,
        })
    }
}
