//! Season schedule: input format and validated form.
//!
//! The input mirrors the league's JSON schedule file: 17 week lists of
//! `[home, away]` (upcoming) or `[home, away, home_score, away_score]` (played)
//! entries. A `*` prefix on a team name marks a neutral-site game; it is parsed
//! into [`Site::Neutral`] here and never carried in names downstream.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::constants::{MAX_SCORE, NEUTRAL_SITE_MARKER, NUM_TEAMS, NUM_WEEKS};
use crate::error::{Result, ValidationError};
use crate::game::Site;
use crate::rating::validate_team_name;

/// One raw schedule entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameInput {
    Upcoming(String, String),
    Played(String, String, i64, i64),
}

/// Raw schedule document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Declared games per week; derived from `schedule` when absent
    #[serde(default)]
    pub expected: Option<Vec<usize>>,
    pub schedule: Vec<Vec<GameInput>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

/// A validated game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub home: String,
    pub away: String,
    pub site: Site,
    /// Final score once the game has been played
    pub result: Option<FinalScore>,
}

impl ScheduledGame {
    pub fn is_played(&self) -> bool {
        self.result.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub games: Vec<ScheduledGame>,
}

impl Week {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Teams playing this week.
    pub fn teams(&self) -> impl Iterator<Item = &str> + '_ {
        self.games
            .iter()
            .flat_map(|g| [g.home.as_str(), g.away.as_str()])
    }
}

/// A full validated season schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    weeks: Vec<Week>,
    teams: BTreeSet<String>,
}

impl Schedule {
    /// Validate a raw schedule.
    ///
    /// Requires exactly 17 weeks matching the declared game counts, no team
    /// twice in one week, scores in `0..100`, and exactly 32 distinct teams
    /// named by 2-3 uppercase letters.
    pub fn new(input: ScheduleInput) -> std::result::Result<Self, ValidationError> {
        let ScheduleInput { expected, schedule } = input;

        if schedule.len() != NUM_WEEKS {
            return Err(ValidationError::WeekCount {
                expected: NUM_WEEKS,
                found: schedule.len(),
            });
        }
        let expected = expected.unwrap_or_else(|| schedule.iter().map(Vec::len).collect());
        if expected.len() != NUM_WEEKS {
            return Err(ValidationError::WeekCount {
                expected: NUM_WEEKS,
                found: expected.len(),
            });
        }

        let mut teams = BTreeSet::new();
        let mut weeks = Vec::with_capacity(NUM_WEEKS);

        for (index, (raw_week, &expected_games)) in schedule.into_iter().zip(&expected).enumerate() {
            let week_number = index + 1;
            if raw_week.len() != expected_games {
                return Err(ValidationError::GameCount {
                    week: week_number,
                    expected: expected_games,
                    found: raw_week.len(),
                });
            }

            let mut seen = HashSet::new();
            let mut games = Vec::with_capacity(raw_week.len());
            for raw in raw_week {
                let game = parse_game(week_number, raw)?;
                for team in [&game.home, &game.away] {
                    if !seen.insert(team.clone()) {
                        return Err(ValidationError::DuplicateTeam {
                            week: week_number,
                            team: team.clone(),
                        });
                    }
                    teams.insert(team.clone());
                }
                games.push(game);
            }
            weeks.push(Week { games });
        }

        if teams.len() != NUM_TEAMS {
            return Err(ValidationError::TeamCount {
                expected: NUM_TEAMS,
                found: teams.len(),
            });
        }

        Ok(Schedule { weeks, teams })
    }

    /// Decode and validate a JSON schedule document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let input: ScheduleInput = serde_json::from_str(json)?;
        Ok(Self::new(input)?)
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Distinct team names, sorted.
    pub fn teams(&self) -> &BTreeSet<String> {
        &self.teams
    }

    pub fn games(&self) -> impl Iterator<Item = &ScheduledGame> + '_ {
        self.weeks.iter().flat_map(|w| w.games.iter())
    }

    pub fn played_games(&self) -> usize {
        self.games().filter(|g| g.is_played()).count()
    }

    pub fn remaining_games(&self) -> usize {
        self.games().filter(|g| !g.is_played()).count()
    }
}

/// Strip a neutral-site marker and validate the remaining team name.
///
/// Returns the bare name and whether the marker was present.
pub fn parse_team_name(raw: &str) -> std::result::Result<(String, bool), ValidationError> {
    let trimmed = raw.trim();
    let (name, neutral) = match trimmed.strip_prefix(NEUTRAL_SITE_MARKER) {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    validate_team_name(name).map_err(|_| ValidationError::InvalidTeamName(raw.to_string()))?;
    Ok((name.to_string(), neutral))
}

fn parse_score(week: usize, team: &str, score: i64) -> std::result::Result<u32, ValidationError> {
    if (0..MAX_SCORE).contains(&score) {
        Ok(score as u32)
    } else {
        Err(ValidationError::ScoreOutOfRange {
            week,
            team: team.to_string(),
            score,
        })
    }
}

fn parse_game(week: usize, raw: GameInput) -> std::result::Result<ScheduledGame, ValidationError> {
    let (raw_home, raw_away, scores) = match raw {
        GameInput::Upcoming(home, away) => (home, away, None),
        GameInput::Played(home, away, hs, as_) => (home, away, Some((hs, as_))),
    };

    let (home, home_marked) = parse_team_name(&raw_home)?;
    let (away, away_marked) = parse_team_name(&raw_away)?;
    let site = if home_marked || away_marked {
        Site::Neutral
    } else {
        Site::HomeField
    };

    let result = match scores {
        Some((hs, as_)) => Some(FinalScore {
            home: parse_score(week, &home, hs)?,
            away: parse_score(week, &away, as_)?,
        }),
        None => None,
    };

    Ok(ScheduledGame {
        home,
        away,
        site,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_JSON: &str = include_str!("../tests/fixtures/schedule.json");

    fn fixture() -> ScheduleInput {
        serde_json::from_str(SCHEDULE_JSON).unwrap()
    }

    #[test]
    fn test_fixture_loads() {
        let schedule = Schedule::from_json_str(SCHEDULE_JSON).unwrap();
        assert_eq!(schedule.weeks().len(), NUM_WEEKS);
        assert_eq!(schedule.teams().len(), NUM_TEAMS);
        assert_eq!(schedule.games().count(), 256);
        assert_eq!(schedule.played_games() + schedule.remaining_games(), 256);
        assert!(schedule.played_games() > 0);
    }

    #[test]
    fn test_neutral_marker_becomes_site() {
        let schedule = Schedule::from_json_str(SCHEDULE_JSON).unwrap();
        let neutral: Vec<&ScheduledGame> = schedule.games().filter(|g| g.site == Site::Neutral).collect();
        assert_eq!(neutral.len(), 2);
        for game in neutral {
            assert!(!game.home.starts_with(NEUTRAL_SITE_MARKER));
            assert!(schedule.teams().contains(&game.home));
        }
    }

    #[test]
    fn test_game_input_shapes() {
        let games: Vec<GameInput> = serde_json::from_str(r#"[["NE", "MIA"], ["*WAS", "CIN", 27, 27]]"#).unwrap();
        assert_eq!(games[0], GameInput::Upcoming("NE".into(), "MIA".into()));
        assert_eq!(games[1], GameInput::Played("*WAS".into(), "CIN".into(), 27, 27));

        let parsed = parse_game(8, games[1].clone()).unwrap();
        assert_eq!(parsed.home, "WAS");
        assert_eq!(parsed.site, Site::Neutral);
        assert_eq!(parsed.result, Some(FinalScore { home: 27, away: 27 }));
    }

    #[test]
    fn test_parse_team_name() {
        assert_eq!(parse_team_name("NE").unwrap(), ("NE".to_string(), false));
        assert_eq!(parse_team_name("*LA").unwrap(), ("LA".to_string(), true));
        assert!(parse_team_name("**LA").is_err());
        assert!(parse_team_name("la").is_err());
        assert!(parse_team_name("LVRD").is_err());
    }

    #[test]
    fn test_rejects_wrong_week_count() {
        let mut input = fixture();
        input.schedule.pop();
        input.expected = None;
        assert_eq!(
            Schedule::new(input),
            Err(ValidationError::WeekCount { expected: 17, found: 16 })
        );
    }

    #[test]
    fn test_rejects_wrong_game_count() {
        let mut input = fixture();
        input.schedule[2].pop();
        assert!(matches!(
            Schedule::new(input),
            Err(ValidationError::GameCount { week: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_team_in_week() {
        let mut input = fixture();
        let first = match &input.schedule[12][0] {
            GameInput::Upcoming(home, _) | GameInput::Played(home, _, _, _) => home.clone(),
        };
        input.schedule[12][1] = GameInput::Upcoming(first.clone(), "ZZZ".into());
        assert_eq!(
            Schedule::new(input),
            Err(ValidationError::DuplicateTeam { week: 13, team: first })
        );
    }

    #[test]
    fn test_rejects_out_of_range_score() {
        let mut input = fixture();
        input.schedule[0][0] = GameInput::Played("ARI".into(), "WAS".into(), 100, 3);
        assert!(matches!(
            Schedule::new(input),
            Err(ValidationError::ScoreOutOfRange { week: 1, score: 100, .. })
        ));

        let mut input = fixture();
        input.schedule[0][0] = GameInput::Played("ARI".into(), "WAS".into(), 10, -3);
        assert!(matches!(
            Schedule::new(input),
            Err(ValidationError::ScoreOutOfRange { score: -3, .. })
        ));
    }

    #[test]
    fn test_rejects_extra_team() {
        let mut input = fixture();
        input.schedule[0][0] = GameInput::Upcoming("ARI".into(), "XYZ".into());
        assert_eq!(
            Schedule::new(input),
            Err(ValidationError::TeamCount { expected: 32, found: 33 })
        );
    }

    #[test]
    fn test_rejects_bad_name() {
        let mut input = fixture();
        input.schedule[0][0] = GameInput::Upcoming("Ari".into(), "WAS".into());
        assert_eq!(
            Schedule::new(input),
            Err(ValidationError::InvalidTeamName("Ari".to_string()))
        );
    }
}
