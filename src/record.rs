use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::constants::GAMES_PER_TEAM;
use crate::error::{DomainError, ValidationError};

/// Win/loss/tie tally for one team.
///
/// Each field stays within `0..=16` and the three sum to at most 16 when
/// constructed. The `add_*` mutators never fail; over-long seasons are caught
/// by the post-season verification instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct RatingRecord {
    wins: u32,
    losses: u32,
    ties: u32,
}

/// Decoded record fields, range-checked by `RatingRecord::new`.
#[derive(Deserialize)]
struct RecordFields {
    wins: i64,
    losses: i64,
    #[serde(default)]
    ties: i64,
}

impl TryFrom<RecordFields> for RatingRecord {
    type Error = ValidationError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        RatingRecord::new(fields.wins, fields.losses, fields.ties)
    }
}

impl RatingRecord {
    pub fn new(wins: i64, losses: i64, ties: i64) -> Result<Self, ValidationError> {
        let limit = i64::from(GAMES_PER_TEAM);
        let in_range = |n: i64| (0..=limit).contains(&n);
        if !(in_range(wins) && in_range(losses) && in_range(ties)) || wins + losses + ties > limit {
            return Err(ValidationError::RecordOutOfRange { wins, losses, ties });
        }
        Ok(RatingRecord {
            wins: wins as u32,
            losses: losses as u32,
            ties: ties as u32,
        })
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn ties(&self) -> u32 {
        self.ties
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    pub fn add_tie(&mut self) {
        self.ties += 1;
    }

    /// Fraction of games won, counting a tie as half a win.
    pub fn win_percent(&self) -> Result<f64, DomainError> {
        match self.games_played() {
            0 => Err(DomainError::NoGamesPlayed),
            games => Ok((self.wins as f64 + 0.5 * self.ties as f64) / games as f64),
        }
    }

    pub fn is_undefeated(&self) -> bool {
        self.wins == GAMES_PER_TEAM && self.losses == 0 && self.ties == 0
    }

    /// Compare by win percentage alone; different records with the same
    /// percentage compare equal. A record with no games ranks as 0.
    pub fn cmp_win_percent(&self, other: &Self) -> Ordering {
        // Cross-multiplied half-wins keep the comparison exact.
        let lhs = u64::from(2 * self.wins + self.ties) * u64::from(other.games_played());
        let rhs = u64::from(2 * other.wins + other.ties) * u64::from(self.games_played());
        match (self.games_played(), other.games_played()) {
            (0, 0) => Ordering::Equal,
            (0, _) => 0.cmp(&(2 * other.wins + other.ties)),
            (_, 0) => (2 * self.wins + self.ties).cmp(&0),
            _ => lhs.cmp(&rhs),
        }
    }
}

impl fmt::Display for RatingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ties > 0 {
            write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            write!(f, "{}-{}", self.wins, self.losses)
        }
    }
}
