use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::NUM_TEAMS;
use crate::error::{Result, ValidationError};
use crate::rating::Rating;
use crate::record::RatingRecord;
use crate::schedule::{parse_team_name, Schedule};

/// Starting rating entry: a bare rating, or `[rating, wins, losses, ties?]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartingRating {
    Bare(i64),
    Detailed(Vec<i64>),
}

impl StartingRating {
    fn into_rating(self, team: &str) -> std::result::Result<Rating, ValidationError> {
        let values = match self {
            StartingRating::Bare(rating) => vec![rating],
            StartingRating::Detailed(values) => values,
        };
        if values.is_empty() || values.len() > 4 {
            return Err(ValidationError::MalformedStartingRating {
                team: team.to_string(),
                len: values.len(),
            });
        }

        let rating = i32::try_from(values[0]).map_err(|_| ValidationError::RatingOutOfRange {
            team: team.to_string(),
            value: values[0],
        })?;
        let field = |i: usize| values.get(i).copied().unwrap_or(0);
        let record = RatingRecord::new(field(1), field(2), field(3))?;
        Rating::new(team, rating, record)
    }
}

/// Team name to rating table for one season.
///
/// Cloning yields a fully independent copy, which is how each Monte Carlo
/// trial gets its own standings. Serialized as the list of ratings; the name
/// index is rebuilt on decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rating>", into = "Vec<Rating>")]
pub struct RatingTable {
    ratings: Vec<Rating>,
    index: HashMap<String, usize>,
}

impl TryFrom<Vec<Rating>> for RatingTable {
    type Error = ValidationError;

    fn try_from(ratings: Vec<Rating>) -> std::result::Result<Self, Self::Error> {
        Self::new(ratings)
    }
}

impl From<RatingTable> for Vec<Rating> {
    fn from(table: RatingTable) -> Self {
        table.ratings
    }
}

impl RatingTable {
    /// Build a table from individual ratings; names must be unique.
    pub fn new(ratings: Vec<Rating>) -> std::result::Result<Self, ValidationError> {
        let mut index = HashMap::with_capacity(ratings.len());
        for (i, rating) in ratings.iter().enumerate() {
            if index.insert(rating.name().to_string(), i).is_some() {
                return Err(ValidationError::DuplicateRating(rating.name().to_string()));
            }
        }
        Ok(RatingTable { ratings, index })
    }

    /// Build the table for `schedule` from starting-rating entries.
    ///
    /// Keys may carry a neutral-site marker, which is ignored. Exactly the
    /// schedule's 32 teams must be present.
    pub fn from_starting(
        starting: HashMap<String, StartingRating>,
        schedule: &Schedule,
    ) -> std::result::Result<Self, ValidationError> {
        let mut ratings = Vec::with_capacity(starting.len());
        for (key, entry) in starting {
            let (name, _) = parse_team_name(&key)?;
            if !schedule.teams().contains(&name) {
                return Err(ValidationError::UnknownTeam(name));
            }
            ratings.push(entry.into_rating(&name)?);
        }
        // HashMap order is arbitrary; keep the table stable across runs.
        ratings.sort_by(|a, b| a.name().cmp(b.name()));

        let table = Self::new(ratings)?;
        if let Some(missing) = schedule.teams().iter().find(|t| !table.contains(t)) {
            return Err(ValidationError::MissingRating(missing.clone()));
        }
        if table.len() != NUM_TEAMS {
            return Err(ValidationError::TeamCount {
                expected: NUM_TEAMS,
                found: table.len(),
            });
        }
        Ok(table)
    }

    /// Decode a JSON starting-ratings document and build the table for `schedule`.
    pub fn from_json_str(json: &str, schedule: &Schedule) -> Result<Self> {
        let starting: HashMap<String, StartingRating> = serde_json::from_str(json)?;
        Ok(Self::from_starting(starting, schedule)?)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.index.contains_key(team)
    }

    pub fn get(&self, team: &str) -> Option<&Rating> {
        self.index.get(team).map(|&i| &self.ratings[i])
    }

    pub fn get_mut(&mut self, team: &str) -> Option<&mut Rating> {
        self.index.get(team).map(|&i| &mut self.ratings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rating> + '_ {
        self.ratings.iter()
    }

    fn position(&self, team: &str) -> std::result::Result<usize, ValidationError> {
        self.index
            .get(team)
            .copied()
            .ok_or_else(|| ValidationError::UnknownTeam(team.to_string()))
    }

    /// Borrow two distinct teams mutably at once.
    pub fn pair_mut(
        &mut self,
        first: &str,
        second: &str,
    ) -> std::result::Result<(&mut Rating, &mut Rating), ValidationError> {
        let i = self.position(first)?;
        let j = self.position(second)?;
        if i == j {
            return Err(ValidationError::DuplicateRating(first.to_string()));
        }
        if i < j {
            let (lo, hi) = self.ratings.split_at_mut(j);
            Ok((&mut lo[i], &mut hi[0]))
        } else {
            let (lo, hi) = self.ratings.split_at_mut(i);
            Ok((&mut hi[0], &mut lo[j]))
        }
    }

    pub fn wins(&self, team: &str) -> Option<u32> {
        self.get(team).map(|r| r.record.wins())
    }

    pub fn losses(&self, team: &str) -> Option<u32> {
        self.get(team).map(|r| r.record.losses())
    }

    pub fn is_undefeated(&self, team: &str) -> bool {
        self.get(team).is_some_and(|r| r.record.is_undefeated())
    }

    /// Names of teams with a perfect record, in table order.
    pub fn undefeated(&self) -> Vec<String> {
        self.ratings
            .iter()
            .filter(|r| r.record.is_undefeated())
            .map(|r| r.name().to_string())
            .collect()
    }

    pub fn number_undefeated(&self) -> usize {
        self.ratings.iter().filter(|r| r.record.is_undefeated()).count()
    }

    /// League-wide (wins, losses, ties).
    pub fn totals(&self) -> (u32, u32, u32) {
        self.ratings.iter().fold((0, 0, 0), |(w, l, t), r| {
            (w + r.record.wins(), l + r.record.losses(), t + r.record.ties())
        })
    }

    /// Teams ordered best first.
    pub fn standings(&self) -> Vec<&Rating> {
        let mut sorted: Vec<&Rating> = self.ratings.iter().collect();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted
    }
}
