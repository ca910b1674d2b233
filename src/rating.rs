use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::ValidationError;
use crate::record::RatingRecord;

/// A team with its current ELO rating and season record.
///
/// Ratings order by record (ascending win percentage) first and by rating
/// second. Name and the raw record fields only break the remaining ties so
/// that the ordering agrees with structural equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RatingFields")]
pub struct Rating {
    name: String,

    /// Current ELO rating, historically centered around 1500
    pub rating: i32,

    /// Season-to-date record, owned by this team alone
    pub record: RatingRecord,
}

#[derive(Deserialize)]
struct RatingFields {
    name: String,
    rating: i32,
    #[serde(default)]
    record: RatingRecord,
}

impl TryFrom<RatingFields> for Rating {
    type Error = ValidationError;

    fn try_from(fields: RatingFields) -> Result<Self, Self::Error> {
        Rating::new(&fields.name, fields.rating, fields.record)
    }
}

impl Rating {
    /// Create a team rating.
    ///
    /// The name must be 2-3 uppercase ASCII letters. Neutral-site markers are
    /// handled by the schedule parser and are rejected here.
    pub fn new(name: &str, rating: i32, record: RatingRecord) -> Result<Self, ValidationError> {
        validate_team_name(name)?;
        Ok(Rating {
            name: name.to_string(),
            rating,
            record,
        })
    }

    /// Create a team with an empty 0-0 record.
    pub fn with_rating(name: &str, rating: i32) -> Result<Self, ValidationError> {
        Self::new(name, rating, RatingRecord::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a win worth `points` rating points.
    pub fn update_win(&mut self, points: i32) {
        self.rating += points;
        self.record.add_win();
    }

    /// Record a loss costing `points` rating points.
    pub fn update_loss(&mut self, points: i32) {
        self.rating -= points;
        self.record.add_loss();
    }

    pub fn update_tie(&mut self) {
        self.record.add_tie();
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record
            .cmp_win_percent(&other.record)
            .then_with(|| self.rating.cmp(&other.rating))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| {
                let key = |r: &RatingRecord| (r.wins(), r.ties(), r.losses());
                key(&self.record).cmp(&key(&other.record))
            })
    }
}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) ELO: {}", self.name, self.record, self.rating)
    }
}

/// Check that `name` is 2-3 uppercase ASCII letters.
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let valid = (2..=3).contains(&name.len()) && name.chars().all(|c| c.is_ascii_uppercase());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidTeamName(name.to_string()))
    }
}
