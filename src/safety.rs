//! Threshold checks on predicted exposure

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Patient;
use crate::metrics::DerivedMetrics;

/// A predicted exposure that warrants attention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SafetyWarning {
    /// AUC24 above 600 mg·h/L
    HighAuc(f64),
    /// Trough above 20 mg/L
    HighTrough(f64),
    /// Peak above 40 mg/L
    HighPeak(f64),
    /// Older than 65 with AUC24 above 550 mg·h/L
    ElderlyHighAuc(f64),
    /// Serum creatinine above 1.5 mg/dL with AUC24 above 500 mg·h/L
    RenalImpairmentAuc(f64),
}

impl fmt::Display for SafetyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyWarning::HighAuc(auc) => write!(
                f,
                "AUC24 of {:.0} mg·h/L is above 600 and increases nephrotoxicity risk",
                auc
            ),
            SafetyWarning::HighTrough(trough) => write!(
                f,
                "Predicted trough of {:.1} mg/L is above 20 mg/L; consider a dose reduction",
                trough
            ),
            SafetyWarning::HighPeak(peak) => write!(
                f,
                "Predicted peak of {:.1} mg/L is above 40 mg/L; consider a longer infusion",
                peak
            ),
            SafetyWarning::ElderlyHighAuc(auc) => write!(
                f,
                "Patient over 65 with AUC24 of {:.0} mg·h/L; enhanced monitoring recommended",
                auc
            ),
            SafetyWarning::RenalImpairmentAuc(auc) => write!(
                f,
                "Elevated serum creatinine with AUC24 of {:.0} mg·h/L; monitor renal function closely",
                auc
            ),
        }
    }
}

/// Check predicted exposure against fixed thresholds
///
/// Sentinel metrics (zero peak and trough) only get the AUC checks.
pub fn assess(metrics: &DerivedMetrics, patient: &Patient) -> Vec<SafetyWarning> {
    let mut warnings = Vec::new();

    if metrics.auc24 > 600.0 {
        warnings.push(SafetyWarning::HighAuc(metrics.auc24));
    }
    if metrics.trough > 20.0 {
        warnings.push(SafetyWarning::HighTrough(metrics.trough));
    }
    if metrics.peak > 40.0 {
        warnings.push(SafetyWarning::HighPeak(metrics.peak));
    }
    if patient.age() > 65.0 && metrics.auc24 > 550.0 {
        warnings.push(SafetyWarning::ElderlyHighAuc(metrics.auc24));
    }
    if patient.scr() > 1.5 && metrics.auc24 > 500.0 {
        warnings.push(SafetyWarning::RenalImpairmentAuc(metrics.auc24));
    }

    for warning in &warnings {
        tracing::debug!("{}", warning);
    }

    warnings
}
