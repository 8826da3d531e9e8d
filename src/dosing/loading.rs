/// Default weight-based loading dose (mg/kg)
pub const DEFAULT_LOADING_MG_PER_KG: f64 = 22.5;

/// Dose rounding increment (mg)
pub const DOSE_INCREMENT: f64 = 250.0;

/// Round `value` to the nearest multiple of `increment`
///
/// Halfway cases round away from zero.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).round() * increment
}

/// Weight-based loading dose (mg), rounded to the nearest 250 mg
///
/// This heuristic is independent of the simulated kinetics.
pub fn loading_dose(weight: f64, mg_per_kg: f64) -> f64 {
    round_to_increment(weight * mg_per_kg, DOSE_INCREMENT)
}

/// [`loading_dose`] limited to `cap` mg
pub fn capped_loading_dose(weight: f64, mg_per_kg: f64, cap: f64) -> f64 {
    loading_dose(weight, mg_per_kg).min(cap)
}
