//! Analytical solution of a one-compartment model with zero-order infusion
//!
//! # Assumptions
//! - elimination is first order with rate constant `k`
//! - the drug enters the central compartment at a constant rate for `t_inf` hours
//! - the compartment is empty before the dose starts

/// Concentration (mg/L) of a single infused dose, `elapsed` hours after it started
///
/// During infusion C = R0 / (k·Vd) · (1 - e^(-k·t)) with R0 = dose / t_inf.
/// After the infusion ends the end-of-infusion concentration decays exponentially.
pub fn single_dose_concentration(elapsed: f64, dose: f64, t_inf: f64, k: f64, vd: f64) -> f64 {
    if elapsed < 0.0 {
        return 0.0;
    }

    let plateau = (dose / t_inf) / (k * vd);
    if elapsed <= t_inf {
        plateau * (1.0 - (-k * elapsed).exp())
    } else {
        let end_of_infusion = plateau * (1.0 - (-k * t_inf).exp());
        end_of_infusion * (-k * (elapsed - t_inf)).exp()
    }
}

/// Closed-form steady-state concentrations at the end of infusion and just
/// before the next dose, for doses of `dose` every `tau` hours
///
/// Returns `(peak, trough)`.
pub fn steady_state_peak_trough(dose: f64, tau: f64, t_inf: f64, k: f64, vd: f64) -> (f64, f64) {
    let end_of_infusion = (dose / t_inf) / (k * vd) * (1.0 - (-k * t_inf).exp());
    let accumulation = 1.0 / (1.0 - (-k * tau).exp());
    let peak = end_of_infusion * accumulation;
    let trough = peak * (-k * (tau - t_inf)).exp();
    (peak, trough)
}
