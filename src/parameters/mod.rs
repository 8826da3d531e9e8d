//! Population pharmacokinetic parameters from weight and renal function

use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

use crate::data::{Options, Patient};
use crate::renal::{resolve_crcl, resolve_weight};

/// Volume of distribution (L)
pub fn volume_of_distribution(weight_used: f64, vd_per_kg: f64) -> f64 {
    vd_per_kg * weight_used
}

/// Clearance (L/h) from creatinine clearance in mL/min
///
/// `offset + scale * crcl / 60`; with the identity calibration (0, 1) this is
/// creatinine clearance expressed per hour.
pub fn clearance(crcl: f64, offset: f64, scale: f64) -> f64 {
    offset + scale * (crcl / 60.0)
}

/// First-order elimination rate constant (1/h)
pub fn elimination_rate(cl: f64, vd: f64) -> f64 {
    cl / vd
}

/// Elimination half-life (h)
pub fn half_life(k: f64) -> f64 {
    LN_2 / k
}

/// The parameters of a one-compartment model for one patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PkParameters {
    /// Dosing weight (kg)
    pub weight_used: f64,
    /// Creatinine clearance (mL/min)
    pub crcl: f64,
    /// Volume of distribution (L)
    pub vd: f64,
    /// Clearance (L/h)
    pub cl: f64,
    /// Elimination rate constant (1/h)
    pub k: f64,
}

impl PkParameters {
    /// Resolve the dosing weight and CrCl, then derive Vd, CL and k
    pub fn derive(patient: &Patient, options: &Options) -> Self {
        let weight_used = resolve_weight(patient, options.weight_strategy);
        let crcl = resolve_crcl(
            patient,
            weight_used,
            options.scr_policy,
            options.crcl_source,
        );
        let vd = volume_of_distribution(weight_used, options.vd_per_kg);
        let cl = clearance(crcl, options.cl_offset, options.cl_scale);
        let k = elimination_rate(cl, vd);

        tracing::debug!(
            weight_used,
            crcl,
            vd,
            cl,
            k,
            "Derived population PK parameters"
        );

        PkParameters {
            weight_used,
            crcl,
            vd,
            cl,
            k,
        }
    }

    /// Build parameters from a fitted clearance and volume, keeping the reference CrCl
    pub fn from_fit(weight_used: f64, crcl: f64, k: f64, vd: f64) -> Self {
        PkParameters {
            weight_used,
            crcl,
            vd,
            cl: k * vd,
            k,
        }
    }

    pub fn half_life(&self) -> f64 {
        half_life(self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CrclSource, Sex, WeightStrategy};
    use approx::assert_relative_eq;

    #[test]
    fn reference_patient() {
        let patient = Patient::new(50.0, Sex::Male, 70.0, 170.0, 1.0);
        let params = PkParameters::derive(&patient, &Options::default());

        assert_relative_eq!(params.weight_used, 70.0);
        assert_relative_eq!(params.crcl, 87.5, epsilon = 1e-10);
        assert_relative_eq!(params.vd, 49.0, epsilon = 1e-10);
        assert_relative_eq!(params.cl, 87.5 / 60.0, epsilon = 1e-10);
        assert_relative_eq!(params.k, 0.029762, epsilon = 1e-6);
    }

    #[test]
    fn calibration_is_applied_after_unit_conversion() {
        assert_relative_eq!(clearance(60.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(clearance(60.0, 0.5, 2.0), 2.5);
    }

    #[test]
    fn weight_strategy_drives_volume() {
        let patient = Patient::new(50.0, Sex::Male, 120.0, 170.0, 1.0);
        let total = PkParameters::derive(&patient, &Options::default());
        let ideal = PkParameters::derive(
            &patient,
            &Options::default().with_weight_strategy(WeightStrategy::Ideal),
        );
        assert!(ideal.vd < total.vd);
        assert!(ideal.crcl < total.crcl);
    }

    #[test]
    fn forced_crcl_drives_clearance() {
        let patient = Patient::new(50.0, Sex::Male, 70.0, 170.0, 1.0);
        let options = Options::default().with_crcl_source(CrclSource::Forced(30.0));
        let params = PkParameters::derive(&patient, &options);

        assert_eq!(params.crcl, 30.0);
        assert_relative_eq!(params.cl, 0.5, epsilon = 1e-12);
        assert_relative_eq!(params.vd, 49.0, epsilon = 1e-10);
    }

    #[test]
    fn fitted_parameters_keep_cl_consistent() {
        let params = PkParameters::from_fit(70.0, 87.5, 0.1, 49.0);
        assert_relative_eq!(params.cl, 4.9, epsilon = 1e-12);
        assert_relative_eq!(params.half_life(), LN_2 / 0.1);
    }
}
