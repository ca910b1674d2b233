use log::trace;
use rand::Rng;

use crate::constants::{GAMES_PER_TEAM, NUM_TEAMS};
use crate::error::{Error, GameError, Result, SimulationError};
use crate::game::{EloGame, GameResult};
use crate::schedule::{Schedule, ScheduledGame, Week};
use crate::standings::RatingTable;

/// Plays one full season of a schedule against its own rating table.
///
/// Played games are replayed from their final scores, the rest are sampled.
/// Games run in schedule order so a seeded generator reproduces a season.
#[derive(Clone, Debug)]
pub struct SeasonSimulator<'a> {
    schedule: &'a Schedule,
    standings: RatingTable,
}

impl<'a> SeasonSimulator<'a> {
    pub fn new(schedule: &'a Schedule, standings: RatingTable) -> Self {
        SeasonSimulator { schedule, standings }
    }

    pub fn standings(&self) -> &RatingTable {
        &self.standings
    }

    pub fn into_standings(self) -> RatingTable {
        self.standings
    }

    /// Play and apply a single game.
    pub fn simulate_game<R: Rng + ?Sized>(
        &mut self,
        week: usize,
        game: &ScheduledGame,
        rng: &mut R,
    ) -> Result<GameResult> {
        let wrap = |source: GameError| Error::Game {
            week,
            home: game.home.clone(),
            away: game.away.clone(),
            source,
        };

        let (home, away) = self.standings.pair_mut(&game.home, &game.away)?;
        let mut elo_game = match game.result {
            Some(score) => EloGame::known(home, away, game.site, score.home, score.away),
            None => EloGame::new(home, away, game.site),
        };
        elo_game.update_teams(rng).map_err(wrap)
    }

    /// Play every game of one week.
    pub fn simulate_week<R: Rng + ?Sized>(&mut self, week_number: usize, week: &Week, rng: &mut R) -> Result<()> {
        trace!("Simulating week {} ({} games)", week_number, week.len());
        for game in &week.games {
            self.simulate_game(week_number, game, rng)?;
        }
        Ok(())
    }

    /// Play all weeks in order, then verify the final standings.
    pub fn simulate_season<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let schedule = self.schedule;
        for (index, week) in schedule.weeks().iter().enumerate() {
            self.simulate_week(index + 1, week, rng)?;
        }
        verify_standings(&self.standings)?;
        Ok(())
    }
}

/// Check end-of-season invariants.
///
/// 32 teams, wins equal losses, 16 x 32 results in total, and 16 games for
/// every team. A failure means the update arithmetic is broken.
pub fn verify_standings(standings: &RatingTable) -> std::result::Result<(), SimulationError> {
    if standings.len() != NUM_TEAMS {
        return Err(SimulationError::TeamCount {
            expected: NUM_TEAMS,
            found: standings.len(),
        });
    }

    let (wins, losses, ties) = standings.totals();
    if wins != losses {
        return Err(SimulationError::UnbalancedResults { wins, losses });
    }
    if wins + losses + ties != GAMES_PER_TEAM * NUM_TEAMS as u32 {
        return Err(SimulationError::TotalGames { wins, losses, ties });
    }

    for team in standings.iter() {
        if team.record.games_played() != GAMES_PER_TEAM {
            return Err(SimulationError::TeamGames {
                team: team.name().to_string(),
                wins: team.record.wins(),
                losses: team.record.losses(),
                ties: team.record.ties(),
            });
        }
    }
    Ok(())
}
