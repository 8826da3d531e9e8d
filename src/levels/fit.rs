use serde::{Deserialize, Serialize};

use crate::data::Level;

/// Straight line through `ln(concentration)` against time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogLinearFit {
    pub intercept: f64,
    /// 1/h, negative for a decaying concentration
    pub slope: f64,
}

impl LogLinearFit {
    /// Elimination rate constant (1/h)
    pub fn k(&self) -> f64 {
        -self.slope
    }

    /// Concentration on the fitted line at `time`
    pub fn predict(&self, time: f64) -> f64 {
        (self.intercept + self.slope * time).exp()
    }
}

/// Ordinary least squares on log-transformed concentrations
///
/// Levels drawn at a single time point give no slope; the fit then has NaN
/// coefficients.
pub fn log_linear_fit(levels: &[Level]) -> LogLinearFit {
    let n = levels.len() as f64;
    let mean_t = levels.iter().map(|l| l.time()).sum::<f64>() / n;
    let mean_y = levels.iter().map(|l| l.concentration().ln()).sum::<f64>() / n;

    let (sxy, sxx) = levels.iter().fold((0.0, 0.0), |(sxy, sxx), level| {
        let dt = level.time() - mean_t;
        (sxy + dt * (level.concentration().ln() - mean_y), sxx + dt * dt)
    });

    if sxx <= 0.0 {
        tracing::warn!(
            levels = levels.len(),
            "Levels share a single sampling time, the log-linear fit is undefined"
        );
        return LogLinearFit {
            intercept: f64::NAN,
            slope: f64::NAN,
        };
    }

    let slope = sxy / sxx;
    LogLinearFit {
        intercept: mean_y - slope * mean_t,
        slope,
    }
}
