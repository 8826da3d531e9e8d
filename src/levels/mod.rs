//! Patient-specific elimination from measured levels
//!
//! Back-calculates the elimination rate from one or more measured concentrations
//! and rebuilds an approximate curve for one dosing interval. The volume of
//! distribution is never fitted: it stays at the population estimate
//! `vd_per_kg * dosing weight`, and clearance follows as `k * Vd`.
//!
//! | Levels | Method |
//! |--------|--------|
//! | none | no result |
//! | one | [`LevelsMethod::SingleLevel`], a rough heuristic |
//! | two or more | [`LevelsMethod::TwoLevel`] on the earliest and latest level, or [`LevelsMethod::Regression`] over all of them |

mod fit;

use serde::{Deserialize, Serialize};

use crate::data::{
    ConcentrationCurve, InfusionShape, Level, LevelSet, MultiLevelFit, Options, Patient, Regimen,
    TimeConcentrationPoint,
};
use crate::error::VancoError;
use crate::metrics::DerivedMetrics;
use crate::parameters::{volume_of_distribution, PkParameters};
use crate::renal::{resolve_crcl, resolve_weight};
use crate::simulator::SimulationGrid;
pub use fit::{log_linear_fit, LogLinearFit};

/// How the elimination rate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelsMethod {
    SingleLevel,
    TwoLevel,
    Regression,
}

/// Parameters, metrics and reconstructed curve fitted from levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelsResult {
    pub metrics: DerivedMetrics,
    /// Fitted k and CL with the population Vd
    pub params: PkParameters,
    /// One dosing interval, starting at the start of the dose
    pub curve: ConcentrationCurve,
    pub method: LevelsMethod,
}

impl LevelsResult {
    /// Pretty-printed JSON for an API layer or a charting front end
    pub fn to_json(&self) -> Result<String, VancoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Elimination rate and peak produced by one of the estimation methods
struct Estimate {
    k: f64,
    peak: f64,
    method: LevelsMethod,
}

/// Fit elimination from a list of levels
///
/// Returns `Ok(None)` when there are no levels. The only error is a dosing
/// interval that cannot be sampled for the reconstructed curve.
pub fn calculate_from_levels(
    patient: &Patient,
    regimen: &Regimen,
    levels: &[Level],
    options: &Options,
) -> Result<Option<LevelsResult>, VancoError> {
    estimate(patient, regimen, &LevelSet::from_levels(levels), options)
}

/// Fit elimination from already classified levels
pub fn estimate(
    patient: &Patient,
    regimen: &Regimen,
    levels: &LevelSet,
    options: &Options,
) -> Result<Option<LevelsResult>, VancoError> {
    if let LevelSet::MultiLevel(sorted) = levels {
        if sorted.len() < 2 {
            return estimate(patient, regimen, &LevelSet::from_levels(sorted), options);
        }
    }

    let estimate = match levels {
        LevelSet::NoLevels => {
            tracing::debug!("No levels supplied, nothing to fit");
            return Ok(None);
        }
        LevelSet::SingleLevel(level) => single_level(level, regimen),
        LevelSet::MultiLevel(sorted) => match options.multi_level_fit {
            MultiLevelFit::EndPoints => two_level(sorted, regimen),
            MultiLevelFit::LogLinearRegression => regression(sorted, regimen),
        },
    };

    if !(estimate.k.is_finite() && estimate.k > 0.0) {
        tracing::warn!(
            k = estimate.k,
            method = ?estimate.method,
            "Levels do not describe a decaying concentration; the fitted elimination rate is not positive"
        );
    }

    let weight_used = resolve_weight(patient, options.weight_strategy);
    let crcl = resolve_crcl(
        patient,
        weight_used,
        options.scr_policy,
        options.crcl_source,
    );
    let vd = volume_of_distribution(weight_used, options.vd_per_kg);
    let params = PkParameters::from_fit(weight_used, crcl, estimate.k, vd);

    let t_inf = regimen.infusion_hours();
    let trough = decay(estimate.peak, estimate.k, regimen.interval() - t_inf);
    let auc24 = regimen.daily_dose() / params.cl;

    let grid = SimulationGrid::new(regimen.interval(), options.grid.step)?;
    let curve = reconstruct_curve(
        estimate.peak,
        estimate.k,
        t_inf,
        &grid,
        options.levels_infusion,
    )?;

    tracing::debug!(
        k = params.k,
        cl = params.cl,
        vd = params.vd,
        peak = estimate.peak,
        trough,
        auc24,
        method = ?estimate.method,
        "Fitted elimination from levels"
    );

    Ok(Some(LevelsResult {
        metrics: DerivedMetrics::new(&params, estimate.peak, trough, auc24),
        params,
        curve,
        method: estimate.method,
    }))
}

fn decay(concentration: f64, k: f64, duration: f64) -> f64 {
    concentration * (-k * duration).exp()
}

/// Single level: an uncalibrated approximation
///
/// The peak is taken as twice the observed level. A level drawn more than an
/// hour after the dose started is timed from that peak; an earlier one is read
/// as a trough drawn one hour before the next dose.
fn single_level(level: &Level, regimen: &Regimen) -> Estimate {
    let peak = 2.0 * level.concentration();
    let elapsed = if level.time() > 1.0 {
        level.time()
    } else {
        regimen.interval() - 1.0
    };
    let k = (peak / level.concentration()).ln() / elapsed;

    Estimate {
        k,
        peak,
        method: LevelsMethod::SingleLevel,
    }
}

/// Peak at the end of infusion, back-extrapolated from a level on the decay
/// line when that level was drawn after the infusion ended
fn peak_from(anchor: &Level, k: f64, t_inf: f64) -> f64 {
    let past_infusion_end = anchor.time() - t_inf;
    if past_infusion_end > 0.0 {
        anchor.concentration() / (-k * past_infusion_end).exp()
    } else {
        anchor.concentration()
    }
}

/// Two or more levels: slope between the earliest and latest
///
/// Exact when both were drawn after the infusion ended and before the next dose.
/// Intermediate levels are ignored.
fn two_level(sorted: &[Level], regimen: &Regimen) -> Estimate {
    let early = &sorted[0];
    let late = &sorted[sorted.len() - 1];

    let k = (early.concentration() / late.concentration()).ln() / (late.time() - early.time());
    if sorted.len() > 2 {
        tracing::debug!(
            ignored = sorted.len() - 2,
            "Using only the earliest and latest levels"
        );
    }

    Estimate {
        k,
        peak: peak_from(early, k, regimen.infusion_hours()),
        method: LevelsMethod::TwoLevel,
    }
}

/// Two or more levels: least-squares line through ln(concentration)
///
/// The peak is read off the fitted line at the end of infusion, or at the
/// earliest level when that was drawn during the infusion. With two levels
/// this is identical to [`two_level`].
fn regression(sorted: &[Level], regimen: &Regimen) -> Estimate {
    let fit = log_linear_fit(sorted);
    let t_inf = regimen.infusion_hours();
    let anchor_time = sorted
        .first()
        .map(|level| level.time().min(t_inf))
        .unwrap_or(t_inf);

    Estimate {
        k: fit.k(),
        peak: fit.predict(anchor_time),
        method: LevelsMethod::Regression,
    }
}

/// Rebuild one dosing interval from a peak at the end of infusion
///
/// After the infusion the concentration decays from the peak. During the
/// infusion it rises from zero to the peak either exponentially, matching the
/// simulator, or along a straight line.
pub fn reconstruct_curve(
    peak: f64,
    k: f64,
    t_inf: f64,
    grid: &SimulationGrid,
    shape: InfusionShape,
) -> Result<ConcentrationCurve, VancoError> {
    let rise = |t: f64| match shape {
        InfusionShape::LinearRamp => peak * t / t_inf,
        InfusionShape::Exponential => peak * (1.0 - (-k * t).exp()) / (1.0 - (-k * t_inf).exp()),
    };

    Ok(grid
        .times()?
        .into_iter()
        .map(|t| {
            let concentration = if t <= t_inf {
                rise(t)
            } else {
                decay(peak, k, t - t_inf)
            };
            TimeConcentrationPoint::new(t, concentration)
        })
        .collect())
}
