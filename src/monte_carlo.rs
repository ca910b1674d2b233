//! Monte Carlo orchestration over many simulated seasons.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{ANY_TEAM, DEFAULT_EXPERIMENTS, DEFAULT_SIMULATIONS, REPORT_COVERAGES};
use crate::error::{DomainError, Result, ValidationError};
use crate::schedule::Schedule;
use crate::season::SeasonSimulator;
use crate::standings::RatingTable;

/// Run-time settings of a Monte Carlo run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Trials per batch
    pub simulations: usize,
    /// Number of batches
    pub experiments: usize,
    /// Fixed seed for reproducible runs; OS entropy when absent
    pub seed: Option<u64>,
    /// Fan trials out over the rayon thread pool
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            simulations: DEFAULT_SIMULATIONS,
            experiments: DEFAULT_EXPERIMENTS,
            seed: None,
            parallel: true,
        }
    }
}

/// What one trial contributes to the aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub undefeated: Vec<String>,
}

/// Run one full season on a private copy of `standings`.
pub fn run_trial(schedule: &Schedule, standings: &RatingTable, seed: u64) -> Result<SeasonSummary> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut season = SeasonSimulator::new(schedule, standings.clone());
    season.simulate_season(&mut rng)?;
    Ok(SeasonSummary {
        undefeated: season.standings().undefeated(),
    })
}

/// Per-batch undefeated counts, sorted ascending, keyed by team (plus `ANY`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefeatedAggregate {
    simulations: usize,
    counts: BTreeMap<String, Vec<usize>>,
    /// `histogram[n]` is the number of trials ending with exactly `n` undefeated teams
    histogram: Vec<usize>,
}

impl UndefeatedAggregate {
    fn new<'t>(teams: impl IntoIterator<Item = &'t String>, simulations: usize) -> Self {
        let mut counts: BTreeMap<String, Vec<usize>> = teams.into_iter().map(|t| (t.clone(), Vec::new())).collect();
        counts.insert(ANY_TEAM.to_string(), Vec::new());
        UndefeatedAggregate {
            simulations,
            counts,
            histogram: Vec::new(),
        }
    }

    fn record_batch(&mut self, summaries: &[SeasonSummary]) {
        let mut batch: BTreeMap<&str, usize> = BTreeMap::new();
        let mut any = 0;
        for summary in summaries {
            for team in &summary.undefeated {
                *batch.entry(team.as_str()).or_insert(0) += 1;
            }
            if !summary.undefeated.is_empty() {
                any += 1;
            }
            let n = summary.undefeated.len();
            if self.histogram.len() <= n {
                self.histogram.resize(n + 1, 0);
            }
            self.histogram[n] += 1;
        }

        for (team, counts) in self.counts.iter_mut() {
            let count = if team == ANY_TEAM {
                any
            } else {
                batch.get(team.as_str()).copied().unwrap_or(0)
            };
            counts.push(count);
        }
    }

    fn finish(&mut self) {
        for counts in self.counts.values_mut() {
            counts.sort_unstable();
        }
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    pub fn experiments(&self) -> usize {
        self.counts.get(ANY_TEAM).map_or(0, Vec::len)
    }

    /// Sorted per-batch counts for `team` (or `ANY`).
    pub fn counts(&self, team: &str) -> Option<&[usize]> {
        self.counts.get(team).map(Vec::as_slice)
    }

    /// Teams that finished undefeated in at least one trial.
    pub fn teams_with_undefeated(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts
            .iter()
            .filter(|(team, counts)| team.as_str() != ANY_TEAM && counts.iter().any(|&c| c > 0))
            .map(|(team, _)| team.as_str())
    }

    /// `p`-th percentile of the per-batch counts, as a percentage of trials.
    pub fn percentile(&self, team: &str, p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(DomainError::Percentile(p).into());
        }
        let counts = self
            .counts(team)
            .ok_or_else(|| ValidationError::UnknownTeam(team.to_string()))?;
        if counts.is_empty() || self.simulations == 0 {
            return Ok(0.0);
        }
        let index = ((counts.len() as f64 * p).floor() as usize).min(counts.len() - 1);
        Ok(100.0 * counts[index] as f64 / self.simulations as f64)
    }

    /// Percentage of all trials that ended with at least `n` undefeated teams.
    /// Every trial has at least zero undefeated teams, so `n == 0` is always
    /// 100 even before any trial has run.
    pub fn probability_at_least(&self, n: usize) -> f64 {
        if n == 0 {
            return 100.0;
        }
        let total: usize = self.histogram.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let hits: usize = self.histogram.iter().skip(n).sum();
        100.0 * hits as f64 / total as f64
    }
}

/// Runs batches of independent season trials and aggregates undefeated counts.
///
/// Every trial gets its own clone of the starting table and its own generator
/// seeded from the engine's master stream in trial order, so results do not
/// depend on whether trials run in parallel.
#[derive(Clone, Debug)]
pub struct MonteCarloEngine {
    schedule: Schedule,
    standings: RatingTable,
    config: MonteCarloConfig,
    rng: ChaCha8Rng,
    aggregate: Option<UndefeatedAggregate>,
}

impl MonteCarloEngine {
    pub fn new(schedule: Schedule, standings: RatingTable, config: MonteCarloConfig) -> Self {
        let rng = match config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        MonteCarloEngine {
            schedule,
            standings,
            config,
            rng,
            aggregate: None,
        }
    }

    /// Load both JSON documents and build an engine.
    pub fn from_json(schedule_json: &str, ratings_json: &str, config: MonteCarloConfig) -> Result<Self> {
        let schedule = Schedule::from_json_str(schedule_json)?;
        let standings = RatingTable::from_json_str(ratings_json, &schedule)?;
        Ok(Self::new(schedule, standings, config))
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn standings(&self) -> &RatingTable {
        &self.standings
    }

    pub fn aggregate(&self) -> Option<&UndefeatedAggregate> {
        self.aggregate.as_ref()
    }

    /// Run `experiments` batches of `seasons` trials, replacing any earlier
    /// aggregate. Any failed trial aborts the whole run.
    pub fn simulate(&mut self, seasons: usize) -> Result<()> {
        let aggregate = self.run_experiments(seasons)?;
        self.config.simulations = seasons;
        self.aggregate = Some(aggregate);
        Ok(())
    }

    fn run_experiments(&mut self, seasons: usize) -> Result<UndefeatedAggregate> {
        let mut aggregate = UndefeatedAggregate::new(self.schedule.teams(), seasons);

        for experiment in 0..self.config.experiments {
            let seeds: Vec<u64> = (0..seasons).map(|_| self.rng.gen::<u64>()).collect();
            let summaries = self.run_batch(&seeds)?;
            aggregate.record_batch(&summaries);
            info!(
                "Experiment {}/{}: {} seasons, {} with an undefeated team",
                experiment + 1,
                self.config.experiments,
                seasons,
                summaries.iter().filter(|s| !s.undefeated.is_empty()).count()
            );
        }

        aggregate.finish();
        Ok(aggregate)
    }

    fn run_batch(&self, seeds: &[u64]) -> Result<Vec<SeasonSummary>> {
        let schedule = &self.schedule;
        let standings = &self.standings;
        if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| run_trial(schedule, standings, seed))
                .collect()
        } else {
            seeds.iter().map(|&seed| run_trial(schedule, standings, seed)).collect()
        }
    }

    fn ensure_simulated(&mut self) -> Result<&UndefeatedAggregate> {
        let aggregate = match self.aggregate.take() {
            Some(aggregate) => aggregate,
            None => {
                debug!("No simulations yet; running {}", self.config.simulations);
                self.run_experiments(self.config.simulations)?
            }
        };
        Ok(self.aggregate.insert(aggregate))
    }

    /// `p`-th percentile of the undefeated probability of `team` (or `ANY`),
    /// in percent. Simulates first if nothing has run yet.
    pub fn percentile(&mut self, team: &str, p: f64) -> Result<f64> {
        self.ensure_simulated()?.percentile(team, p)
    }

    /// Percentage of trials with at least `n` undefeated teams.
    pub fn probability_at_least(&mut self, n: usize) -> Result<f64> {
        Ok(self.ensure_simulated()?.probability_at_least(n))
    }

    /// Percentile bands for `ANY` and every team that went undefeated at
    /// least once.
    pub fn report(&mut self) -> Result<UndefeatedReport> {
        let aggregate = self.ensure_simulated()?;
        let teams = std::iter::once(ANY_TEAM).chain(aggregate.teams_with_undefeated());

        let mut rows = Vec::new();
        for team in teams {
            let mut bands = Vec::with_capacity(REPORT_COVERAGES.len());
            for coverage in REPORT_COVERAGES {
                bands.push(PercentileBand {
                    coverage,
                    low: aggregate.percentile(team, (1.0 - coverage) / 2.0)?,
                    high: aggregate.percentile(team, (1.0 + coverage) / 2.0)?,
                });
            }
            rows.push(ReportRow {
                team: team.to_string(),
                bands,
                median: aggregate.percentile(team, 0.5)?,
            });
        }

        Ok(UndefeatedReport {
            simulations: aggregate.simulations(),
            experiments: aggregate.experiments(),
            rows,
        })
    }
}

/// Two-sided interval covering `coverage` of the batches, in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub coverage: f64,
    pub low: f64,
    pub high: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub team: String,
    pub bands: Vec<PercentileBand>,
    pub median: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndefeatedReport {
    pub simulations: usize,
    pub experiments: usize,
    pub rows: Vec<ReportRow>,
}

impl UndefeatedReport {
    pub fn row(&self, team: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.team == team)
    }
}

impl fmt::Display for UndefeatedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for coverage_index in 0..REPORT_COVERAGES.len() {
            for row in &self.rows {
                if let Some(band) = row.bands.get(coverage_index) {
                    writeln!(
                        f,
                        "{:<3} [{}%]: {:.2}% - {:.2}%",
                        row.team,
                        (band.coverage * 100.0).round(),
                        band.low,
                        band.high
                    )?;
                }
            }
        }
        for row in &self.rows {
            writeln!(f, "{:<3} [50%]: {:.2}%", row.team, row.median)?;
        }
        Ok(())
    }
}
