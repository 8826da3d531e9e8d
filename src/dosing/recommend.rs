//! Maintenance regimen search
//!
//! Every allowed interval is combined with every dose step up to the single-dose
//! limit. Candidates over the daily limit are dropped; the rest are scored on
//! how well their steady-state AUC24 fits the target window.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data::Regimen;
use crate::error::{ensure_positive, VancoError};
use crate::parameters::PkParameters;
use crate::simulator::steady_state_peak_trough;

/// Upper bound on the number of (interval, dose) pairs evaluated in one search
pub const MAX_CANDIDATES: usize = 100_000;

/// Guardrails and targets of the regimen search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationLimits {
    /// Largest single dose (mg)
    pub max_single_dose: f64,
    /// Largest total daily dose (mg)
    pub max_daily_dose: f64,
    /// Dosing intervals to consider (h), in order of preference
    pub intervals: Vec<f64>,
    /// Dose step (mg)
    pub dose_increment: f64,
    /// Lower bound of the AUC24 target window (mg·h/L)
    pub auc_low: f64,
    /// Upper bound of the AUC24 target window (mg·h/L)
    pub auc_high: f64,
    /// Preferred AUC24 inside the window (mg·h/L)
    pub auc_mid: f64,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            max_single_dose: 2000.0,
            max_daily_dose: 4500.0,
            intervals: vec![12.0, 24.0, 8.0, 6.0, 48.0],
            dose_increment: 250.0,
            auc_low: 400.0,
            auc_high: 600.0,
            auc_mid: 500.0,
        }
    }
}

impl RecommendationLimits {
    /// Reject limits that cannot be searched within bounds
    pub fn validate(&self) -> Result<(), VancoError> {
        ensure_positive("limits.dose_increment", self.dose_increment)?;
        ensure_positive("limits.max_single_dose", self.max_single_dose)?;
        ensure_positive("limits.max_daily_dose", self.max_daily_dose)?;
        for &interval in &self.intervals {
            ensure_positive("limits.intervals", interval)?;
        }
        if let Some(Ordering::Greater) | None = self.auc_low.partial_cmp(&self.auc_high) {
            return Err(VancoError::invalid_input("limits.auc_low", self.auc_low));
        }

        let candidates = self.dose_steps() * self.intervals.len() as f64;
        if candidates > MAX_CANDIDATES as f64 {
            return Err(VancoError::invalid_input(
                "limits.dose_increment",
                self.dose_increment,
            ));
        }
        Ok(())
    }

    fn dose_steps(&self) -> f64 {
        (self.max_single_dose / self.dose_increment).floor()
    }

    fn in_target(&self, auc24: f64) -> bool {
        (self.auc_low..=self.auc_high).contains(&auc24)
    }

    /// Distance to the midpoint when inside the window, to the nearest bound otherwise
    fn target_distance(&self, auc24: f64) -> f64 {
        if self.in_target(auc24) {
            (auc24 - self.auc_mid).abs()
        } else {
            (auc24 - self.auc_low).abs().min((auc24 - self.auc_high).abs())
        }
    }

    fn interval_rank(&self, interval: f64) -> usize {
        self.intervals
            .iter()
            .position(|&i| (i - interval).abs() < 1e-9)
            .unwrap_or(usize::MAX)
    }
}

/// Infusion duration (min) for a dose: 60 below 1500 mg, 90 below 2000 mg, else 120
pub fn infusion_minutes_for_dose(dose: f64) -> f64 {
    if dose >= 2000.0 {
        120.0
    } else if dose >= 1500.0 {
        90.0
    } else {
        60.0
    }
}

/// A regimen evaluated at steady state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRegimen {
    pub regimen: Regimen,
    /// mg·h/L
    pub auc24: f64,
    /// mg/L
    pub peak: f64,
    /// mg/L
    pub trough: f64,
    /// mg
    pub daily_dose: f64,
}

impl CandidateRegimen {
    pub fn evaluate(regimen: Regimen, params: &PkParameters) -> Self {
        let (peak, trough) = steady_state_peak_trough(
            regimen.dose(),
            regimen.interval(),
            regimen.infusion_hours(),
            params.k,
            params.vd,
        );
        CandidateRegimen {
            auc24: regimen.daily_dose() / params.cl,
            daily_dose: regimen.daily_dose(),
            peak,
            trough,
            regimen,
        }
    }
}

/// Ordered candidates and any warning about the best one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Best first
    pub candidates: Vec<CandidateRegimen>,
    pub warnings: Vec<String>,
}

impl Recommendation {
    pub fn best(&self) -> Option<&CandidateRegimen> {
        self.candidates.first()
    }
}

fn compare(limits: &RecommendationLimits, a: &CandidateRegimen, b: &CandidateRegimen) -> Ordering {
    // In-target candidates sort first
    limits
        .in_target(b.auc24)
        .cmp(&limits.in_target(a.auc24))
        .then_with(|| {
            limits
                .target_distance(a.auc24)
                .total_cmp(&limits.target_distance(b.auc24))
        })
        .then_with(|| {
            limits
                .interval_rank(a.regimen.interval())
                .cmp(&limits.interval_rank(b.regimen.interval()))
        })
        .then_with(|| a.daily_dose.total_cmp(&b.daily_dose))
        .then_with(|| a.trough.total_cmp(&b.trough))
}

/// Search maintenance regimens for a patient
///
/// Limits that fail [`RecommendationLimits::validate`] give no candidates and a
/// single warning naming the offending entry.
pub fn recommend_regimens(params: &PkParameters, limits: &RecommendationLimits) -> Recommendation {
    if let Err(error) = limits.validate() {
        tracing::warn!(%error, "Regimen search skipped");
        return Recommendation {
            candidates: Vec::new(),
            warnings: vec![format!("Regimen search skipped: {}", error)],
        };
    }
    let steps = limits.dose_steps() as usize;

    let grid: Vec<(f64, f64)> = limits
        .intervals
        .iter()
        .flat_map(|&interval| {
            (1..=steps).map(move |step| (interval, step as f64 * limits.dose_increment))
        })
        .collect();

    let mut candidates: Vec<CandidateRegimen> = grid
        .par_iter()
        .filter(|(interval, dose)| dose * 24.0 / interval <= limits.max_daily_dose)
        .map(|&(interval, dose)| {
            let regimen = Regimen::new(dose, interval, infusion_minutes_for_dose(dose));
            CandidateRegimen::evaluate(regimen, params)
        })
        .collect();

    candidates.sort_by(|a, b| compare(limits, a, b));

    let mut warnings = Vec::new();
    match candidates.first() {
        Some(best) if !limits.in_target(best.auc24) => {
            tracing::warn!(auc24 = best.auc24, "No regimen reaches the AUC24 target");
            warnings.push(format!(
                "Unable to reach {:.0}-{:.0} mg·h/L within the dose limits; closest is {:.0}",
                limits.auc_low, limits.auc_high, best.auc24
            ));
        }
        Some(best) => {
            tracing::debug!(
                dose = best.regimen.dose(),
                interval = best.regimen.interval(),
                auc24 = best.auc24,
                "Recommended regimen"
            );
        }
        None => {
            tracing::warn!("No regimen satisfies the dose limits");
            warnings.push("No regimen satisfies the dose limits".to_string());
        }
    }

    Recommendation {
        candidates,
        warnings,
    }
}
