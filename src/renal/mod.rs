//! Renal function and dosing weight
//!
//! Cockcroft-Gault creatinine clearance and the body weight descriptors used to
//! pick the weight that drives it.

use crate::data::{CrclSource, Patient, ScrPolicy, Sex, WeightStrategy};

/// Lower bound on estimated creatinine clearance (mL/min)
pub const MIN_CRCL: f64 = 10.0;

/// BMI (kg/m²) at and above which the automatic strategy uses adjusted body weight
pub const OBESITY_BMI: f64 = 30.0;

const CM_PER_INCH: f64 = 2.54;

/// Cockcroft-Gault creatinine clearance (mL/min)
///
/// CrCl = (140 - age) * weight * f / (72 * SCr), with f = 0.85 for females.
/// The serum creatinine is first passed through `policy` and the result is
/// floored at [`MIN_CRCL`].
pub fn creatinine_clearance(age: f64, sex: Sex, scr: f64, weight: f64, policy: ScrPolicy) -> f64 {
    let sex_factor = match sex {
        Sex::Female => 0.85,
        Sex::Male => 1.0,
    };
    let scr = policy.apply(scr);
    floor_crcl((140.0 - age) * weight * sex_factor / (72.0 * scr))
}

fn floor_crcl(crcl: f64) -> f64 {
    if crcl < MIN_CRCL {
        tracing::warn!(
            "CrCl {:.2} mL/min is below {} mL/min, using the floor",
            crcl,
            MIN_CRCL
        );
        MIN_CRCL
    } else {
        crcl
    }
}

/// Creatinine clearance (mL/min) for a patient dosed on `weight`
///
/// A forced clearance replaces Cockcroft-Gault, and the serum creatinine
/// policy is then irrelevant. Either way the result is floored at [`MIN_CRCL`].
pub fn resolve_crcl(
    patient: &Patient,
    weight: f64,
    policy: ScrPolicy,
    source: CrclSource,
) -> f64 {
    match source {
        CrclSource::CockcroftGault => {
            creatinine_clearance(patient.age(), patient.sex(), patient.scr(), weight, policy)
        }
        CrclSource::Forced(crcl) => {
            tracing::debug!(crcl, "Using forced creatinine clearance");
            floor_crcl(crcl)
        }
    }
}

/// Ideal body weight by the Devine formula (kg)
///
/// 50 kg (male) or 45.5 kg (female) plus 2.3 kg per inch over 60 inches.
/// Patients shorter than 60 inches get the base weight.
pub fn ideal_body_weight(height: f64, sex: Sex) -> f64 {
    let base = match sex {
        Sex::Male => 50.0,
        Sex::Female => 45.5,
    };
    let inches_over_60 = (height / CM_PER_INCH - 60.0).max(0.0);
    base + 2.3 * inches_over_60
}

/// Adjusted body weight (kg)
pub fn adjusted_body_weight(tbw: f64, ibw: f64) -> f64 {
    ibw + 0.4 * (tbw - ibw)
}

/// Body mass index (kg/m²) from weight in kg and height in cm
pub fn body_mass_index(weight: f64, height: f64) -> f64 {
    let meters = height / 100.0;
    weight / (meters * meters)
}

/// The dosing weight (kg) for a patient under the given strategy
pub fn resolve_weight(patient: &Patient, strategy: WeightStrategy) -> f64 {
    let tbw = patient.weight();
    let ibw = || ideal_body_weight(patient.height(), patient.sex());

    match strategy {
        WeightStrategy::Total => tbw,
        WeightStrategy::Ideal => ibw(),
        WeightStrategy::Adjusted => adjusted_body_weight(tbw, ibw()),
        WeightStrategy::Auto => {
            let ibw = ibw();
            if tbw < ibw {
                tbw
            } else if body_mass_index(tbw, patient.height()) >= OBESITY_BMI {
                adjusted_body_weight(tbw, ibw)
            } else {
                ibw
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cockcroft_gault_male() {
        let crcl = creatinine_clearance(50.0, Sex::Male, 1.0, 70.0, ScrPolicy::AsMeasured);
        assert_relative_eq!(crcl, 87.5, epsilon = 1e-10);
    }

    #[test]
    fn cockcroft_gault_female_factor() {
        let male = creatinine_clearance(60.0, Sex::Male, 1.2, 65.0, ScrPolicy::AsMeasured);
        let female = creatinine_clearance(60.0, Sex::Female, 1.2, 65.0, ScrPolicy::AsMeasured);
        assert_relative_eq!(female, 0.85 * male, epsilon = 1e-10);
    }

    #[test]
    fn scr_floor_lowers_clearance_for_low_creatinine() {
        let raw = creatinine_clearance(40.0, Sex::Male, 0.5, 80.0, ScrPolicy::AsMeasured);
        let floored = creatinine_clearance(40.0, Sex::Male, 0.5, 80.0, ScrPolicy::Floor(1.0));
        assert_relative_eq!(raw, 2.0 * floored, epsilon = 1e-10);
    }

    #[test]
    fn crcl_is_floored() {
        let crcl = creatinine_clearance(95.0, Sex::Female, 8.0, 45.0, ScrPolicy::AsMeasured);
        assert_relative_eq!(crcl, MIN_CRCL);
    }

    #[test]
    fn ideal_body_weight_tall_male() {
        // 182.88 cm = 72 in
        let ibw = ideal_body_weight(182.88, Sex::Male);
        assert_relative_eq!(ibw, 50.0 + 2.3 * 12.0, epsilon = 1e-9);
    }

    #[test]
    fn forced_crcl_replaces_cockcroft_gault() {
        let patient = Patient::new(50.0, Sex::Male, 70.0, 170.0, 1.0);
        let forced = CrclSource::Forced(42.0);
        assert_eq!(resolve_crcl(&patient, 70.0, ScrPolicy::Floor(2.0), forced), 42.0);
        assert_relative_eq!(
            resolve_crcl(&patient, 70.0, ScrPolicy::AsMeasured, CrclSource::CockcroftGault),
            87.5,
            epsilon = 1e-10
        );
    }

    #[test]
    fn forced_crcl_is_floored() {
        let patient = Patient::new(50.0, Sex::Male, 70.0, 170.0, 1.0);
        let crcl = resolve_crcl(&patient, 70.0, ScrPolicy::AsMeasured, CrclSource::Forced(4.0));
        assert_eq!(crcl, MIN_CRCL);
    }

    #[test]
    fn ideal_body_weight_short_female_is_clamped() {
        assert_relative_eq!(ideal_body_weight(140.0, Sex::Female), 45.5);
    }

    #[test]
    fn adjusted_equals_ideal_when_weights_match() {
        assert_eq!(adjusted_body_weight(63.7, 63.7), 63.7);
        assert_relative_eq!(adjusted_body_weight(120.0, 70.0), 90.0);
    }

    #[test]
    fn total_strategy_returns_total_weight() {
        let patient = Patient::new(50.0, Sex::Male, 123.4, 170.0, 1.0);
        assert_eq!(resolve_weight(&patient, WeightStrategy::Total), 123.4);
    }

    #[test]
    fn ideal_strategy_ignores_actual_weight() {
        let light = Patient::new(50.0, Sex::Female, 55.0, 165.0, 1.0);
        let heavy = Patient::new(50.0, Sex::Female, 140.0, 165.0, 1.0);
        assert_eq!(
            resolve_weight(&light, WeightStrategy::Ideal),
            resolve_weight(&heavy, WeightStrategy::Ideal)
        );
    }

    #[test]
    fn auto_strategy_branches() {
        // Underweight: TBW below IBW
        let under = Patient::new(30.0, Sex::Male, 55.0, 180.0, 1.0);
        assert_eq!(resolve_weight(&under, WeightStrategy::Auto), 55.0);

        // Obese: BMI = 110 / 1.7^2 ~ 38
        let obese = Patient::new(30.0, Sex::Male, 110.0, 170.0, 1.0);
        let ibw = ideal_body_weight(170.0, Sex::Male);
        assert_relative_eq!(
            resolve_weight(&obese, WeightStrategy::Auto),
            adjusted_body_weight(110.0, ibw)
        );

        // Normal: BMI ~ 24.2, above IBW
        let normal = Patient::new(30.0, Sex::Male, 70.0, 170.0, 1.0);
        assert_relative_eq!(resolve_weight(&normal, WeightStrategy::Auto), ibw);
    }

    #[test]
    fn bmi() {
        assert_relative_eq!(body_mass_index(81.0, 180.0), 25.0, epsilon = 1e-10);
    }
}
