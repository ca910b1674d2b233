//! Python bindings.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::Error;
use crate::monte_carlo::{MonteCarloConfig, MonteCarloEngine};
use crate::win_prob;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Game { .. } | Error::Simulation(_) => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Monte Carlo season engine.
#[pyclass(name = "MonteCarloEngine")]
pub struct PyMonteCarloEngine {
    inner: MonteCarloEngine,
}

#[pymethods]
impl PyMonteCarloEngine {
    /// Build an engine from a schedule JSON document and a starting-ratings
    /// JSON document.
    #[new]
    #[pyo3(signature = (schedule_json, ratings_json, simulations = 2000, experiments = 250, seed = None, parallel = true))]
    fn new(
        schedule_json: &str,
        ratings_json: &str,
        simulations: usize,
        experiments: usize,
        seed: Option<u64>,
        parallel: bool,
    ) -> PyResult<Self> {
        let config = MonteCarloConfig {
            simulations,
            experiments,
            seed,
            parallel,
        };
        Ok(PyMonteCarloEngine {
            inner: MonteCarloEngine::from_json(schedule_json, ratings_json, config)?,
        })
    }

    /// Run all batches with `seasons` trials each.
    fn simulate(&mut self, py: Python<'_>, seasons: usize) -> PyResult<()> {
        let inner = &mut self.inner;
        py.allow_threads(|| inner.simulate(seasons))?;
        Ok(())
    }

    /// Undefeated probability percentile (percent) for a team or "ANY".
    fn percentile(&mut self, team: &str, p: f64) -> PyResult<f64> {
        Ok(self.inner.percentile(team, p)?)
    }

    /// Percentage of trials with at least `n` undefeated teams.
    fn probability_at_least(&mut self, n: usize) -> PyResult<f64> {
        Ok(self.inner.probability_at_least(n)?)
    }

    /// Rendered percentile report.
    fn report(&mut self) -> PyResult<String> {
        Ok(self.inner.report()?.to_string())
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "MonteCarloEngine({} teams, {} simulations x {} experiments)",
            self.inner.standings().len(),
            config.simulations,
            config.experiments
        )
    }
}

#[pyfunction]
fn win_probability(rating_gap: i32) -> f64 {
    win_prob::win_probability(rating_gap)
}

#[pyfunction]
fn inverse_erf(x: f64) -> PyResult<f64> {
    Ok(win_prob::inverse_erf(x).map_err(Error::from)?)
}

#[pyfunction]
fn gaussian_sigma(mean_margin: f64, probability: f64) -> PyResult<f64> {
    Ok(win_prob::gaussian_sigma(mean_margin, probability).map_err(Error::from)?)
}

/// Python module definition
#[pymodule]
fn elo_season(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMonteCarloEngine>()?;

    m.add_function(wrap_pyfunction!(win_probability, m)?)?;
    m.add_function(wrap_pyfunction!(inverse_erf, m)?)?;
    m.add_function(wrap_pyfunction!(gaussian_sigma, m)?)?;

    m.add("ANY_TEAM", crate::constants::ANY_TEAM)?;
    m.add("HOME_FIELD_ADVANTAGE", crate::constants::HOME_FIELD_ADVANTAGE)?;
    m.add("K_FACTOR", crate::constants::K_FACTOR)?;

    Ok(())
}
