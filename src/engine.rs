//! Population-parameter pipeline
//!
//! Patient and regimen in, exposure out: the dosing weight and creatinine
//! clearance give Vd, CL and k, the regimen is simulated over
//! [`Options::grid`], and peak, trough and AUC24 are read from the curve.

use serde::{Deserialize, Serialize};

use crate::data::{ConcentrationCurve, Options, Patient, Regimen};
use crate::error::VancoError;
use crate::metrics::{compute_auc24, extract_peak_trough, DerivedMetrics};
use crate::parameters::PkParameters;
use crate::safety::{assess, SafetyWarning};
use crate::simulator::simulate;

/// Everything reported for one deterministic calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterministicResult {
    pub metrics: DerivedMetrics,
    pub curve: ConcentrationCurve,
    pub params: PkParameters,
    /// h
    pub half_life: f64,
    /// mg
    pub daily_dose: f64,
    /// Daily dose per kg of total body weight
    pub mg_per_kg_per_day: f64,
    pub warnings: Vec<SafetyWarning>,
}

impl DeterministicResult {
    /// Pretty-printed JSON for an API layer or a charting front end
    pub fn to_json(&self) -> Result<String, VancoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the deterministic pipeline for one patient and regimen
///
/// Fails only when the simulation grid or the number of doses it covers is out
/// of bounds. Numeric degeneracies (zero clearance, an empty sampling window)
/// are carried through as infinities or the zero peak/trough sentinel.
pub fn calculate_deterministic(
    patient: &Patient,
    regimen: &Regimen,
    options: &Options,
) -> Result<DeterministicResult, VancoError> {
    let params = PkParameters::derive(patient, options);
    let curve = simulate(regimen, &params, &options.grid)?;

    let peak_trough = extract_peak_trough(&curve, regimen.interval(), regimen.infusion_hours());
    let auc24 = compute_auc24(regimen, params.cl, &curve, options.auc_method);
    let metrics = DerivedMetrics::new(&params, peak_trough.peak, peak_trough.trough, auc24);
    let warnings = assess(&metrics, patient);

    tracing::debug!(
        peak = metrics.peak,
        trough = metrics.trough,
        auc24 = metrics.auc24,
        warnings = warnings.len(),
        "Deterministic calculation complete"
    );

    Ok(DeterministicResult {
        half_life: params.half_life(),
        daily_dose: regimen.daily_dose(),
        mg_per_kg_per_day: regimen.daily_dose() / patient.weight(),
        metrics,
        curve,
        params,
        warnings,
    })
}
