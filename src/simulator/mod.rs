//! Deterministic multi-dose concentration-time simulation
//!
//! The multi-dose curve is built by superposition: under linear kinetics the
//! concentration at time `t` is the sum of the single-dose responses of every dose
//! started at or before `t`. The cost is O(samples × doses so far), which is why
//! [`SimulationGrid`] bounds both.

pub mod infusion;

use serde::{Deserialize, Serialize};

use crate::data::{ConcentrationCurve, Regimen, TimeConcentrationPoint};
use crate::error::VancoError;
use crate::parameters::PkParameters;
pub use infusion::{single_dose_concentration, steady_state_peak_trough};

/// Default simulation horizon (h)
pub const DEFAULT_HORIZON: f64 = 48.0;
/// Default sampling step (h)
pub const DEFAULT_STEP: f64 = 0.1;
/// Upper bound on the number of samples in one simulation
pub const MAX_SAMPLES: usize = 100_000;
/// Upper bound on the number of doses superposed in one simulation
pub const MAX_DOSES: usize = 10_000;

/// Sampling grid of a simulation: `0, step, 2·step, ..., horizon`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationGrid {
    /// Last sampled time (h)
    pub horizon: f64,
    /// Distance between samples (h)
    pub step: f64,
}

impl Default for SimulationGrid {
    fn default() -> Self {
        SimulationGrid {
            horizon: DEFAULT_HORIZON,
            step: DEFAULT_STEP,
        }
    }
}

impl SimulationGrid {
    /// Create a grid, rejecting ones that cannot be evaluated within bounds
    pub fn new(horizon: f64, step: f64) -> Result<Self, VancoError> {
        let grid = SimulationGrid { horizon, step };
        grid.sample_count()?;
        Ok(grid)
    }

    /// Number of samples on the grid, including time zero and the horizon
    pub fn sample_count(&self) -> Result<usize, VancoError> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(VancoError::InvalidGrid {
                reason: format!("horizon must be positive, got {}", self.horizon),
            });
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(VancoError::InvalidGrid {
                reason: format!("step must be positive, got {}", self.step),
            });
        }

        // The small tolerance keeps 48 / 0.1 from landing just under 480
        let intervals = (self.horizon / self.step + 1e-9).floor();
        if intervals >= MAX_SAMPLES as f64 {
            return Err(VancoError::InvalidGrid {
                reason: format!(
                    "{} h sampled every {} h exceeds {} samples",
                    self.horizon, self.step, MAX_SAMPLES
                ),
            });
        }
        Ok(intervals as usize + 1)
    }

    /// Sample times, computed as multiples of the step
    pub fn times(&self) -> Result<Vec<f64>, VancoError> {
        let n = self.sample_count()?;
        Ok((0..n).map(|i| i as f64 * self.step).collect())
    }
}

/// Number of doses of `regimen` started within `[0, horizon]`
fn doses_within(regimen: &Regimen, horizon: f64) -> Result<usize, VancoError> {
    let count = (horizon / regimen.interval()).floor() + 1.0;
    if !count.is_finite() || count > MAX_DOSES as f64 {
        return Err(VancoError::InvalidGrid {
            reason: format!(
                "interval of {} h gives more than {} doses within {} h",
                regimen.interval(),
                MAX_DOSES,
                horizon
            ),
        });
    }
    Ok(count.max(0.0) as usize)
}

/// Multi-dose concentration (mg/L) at an arbitrary time
pub fn concentration_at(
    time: f64,
    regimen: &Regimen,
    params: &PkParameters,
) -> Result<f64, VancoError> {
    let n_doses = doses_within(regimen, time)?;
    let t_inf = regimen.infusion_hours();
    Ok((0..n_doses)
        .map(|i| {
            single_dose_concentration(
                time - regimen.dose_time(i),
                regimen.dose(),
                t_inf,
                params.k,
                params.vd,
            )
        })
        .sum())
}

/// Simulate the concentration-time curve of a regimen on a grid
///
/// Every sample sums the responses of all doses given at or before it. The
/// curve only approaches steady state if the horizon spans enough half-lives.
pub fn simulate(
    regimen: &Regimen,
    params: &PkParameters,
    grid: &SimulationGrid,
) -> Result<ConcentrationCurve, VancoError> {
    let times = grid.times()?;
    let n_doses = doses_within(regimen, grid.horizon)?;
    let t_inf = regimen.infusion_hours();

    let dose_times: Vec<f64> = (0..n_doses).map(|i| regimen.dose_time(i)).collect();

    let points: Vec<TimeConcentrationPoint> = times
        .into_iter()
        .map(|t| {
            let concentration = dose_times
                .iter()
                .take_while(|&&dose_time| dose_time <= t)
                .map(|&dose_time| {
                    single_dose_concentration(
                        t - dose_time,
                        regimen.dose(),
                        t_inf,
                        params.k,
                        params.vd,
                    )
                })
                .sum();
            TimeConcentrationPoint::new(t, concentration)
        })
        .collect();

    tracing::debug!(
        samples = points.len(),
        doses = n_doses,
        horizon = grid.horizon,
        step = grid.step,
        "Simulated regimen"
    );

    Ok(ConcentrationCurve::new(points))
}
