//! Exposure metrics: peak, trough and AUC over 24 hours
//!
//! Peak and trough are read off the last complete dosing cycle of a simulated
//! curve. AUC24 comes either from the closed form (daily dose / CL) or from
//! trapezoidal integration of the simulated curve; see [`AucMethod`].

use serde::{Deserialize, Serialize};

use crate::data::{auc, AucMethod, ConcentrationCurve, Regimen};
use crate::parameters::PkParameters;

/// Tolerance (h) when deciding whether a cycle ends within the curve
const TIME_EPS: f64 = 1e-9;

/// Peak and trough of one dosing cycle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakTrough {
    /// Concentration at the sample nearest the end of infusion (mg/L)
    pub peak: f64,
    /// Time of that sample (h)
    pub peak_time: f64,
    /// Lowest concentration in the cycle (mg/L)
    pub trough: f64,
    /// Time of the lowest concentration (h)
    pub trough_time: f64,
}

impl PeakTrough {
    /// Zeroed result returned when the cycle window holds no samples
    pub fn sentinel() -> Self {
        PeakTrough::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.peak == 0.0 && self.trough == 0.0
    }
}

/// Start time of the last dosing cycle that ends within the curve
///
/// This is `floor(last / interval) * interval`, moved back by one interval when
/// that cycle would run past the last sample (for example a 48 h curve with a
/// 12 h interval analyses [36, 48), not [48, 60)).
pub fn last_cycle_start(last_time: f64, interval: f64) -> f64 {
    let start = (last_time / interval).floor() * interval;
    if start + interval > last_time + TIME_EPS {
        start - interval
    } else {
        start
    }
}

/// Peak and trough of the last complete dosing cycle of a curve
///
/// The peak is the sample closest to the end of infusion (no interpolation, so
/// the error is at most half the sampling step); the trough is the lowest sample
/// in the cycle. When the cycle window holds no samples, which happens when the
/// interval is longer than the curve or is not positive, the zeroed
/// [`PeakTrough::sentinel`] is returned.
pub fn extract_peak_trough(curve: &ConcentrationCurve, interval: f64, t_inf: f64) -> PeakTrough {
    let Some(last_time) = curve.last_time() else {
        tracing::warn!("Cannot extract peak and trough from an empty curve");
        return PeakTrough::sentinel();
    };

    let cycle_start = last_cycle_start(last_time, interval);
    let cycle_end = cycle_start + interval;
    let target = cycle_start + t_inf;

    let mut window = curve.window(cycle_start, cycle_end).peekable();
    if window.peek().is_none() {
        tracing::warn!(
            "No samples in the cycle window [{}, {}) of a {} h curve, check the horizon and interval",
            cycle_start,
            cycle_end,
            last_time
        );
        return PeakTrough::sentinel();
    }

    let mut result = PeakTrough {
        peak: 0.0,
        peak_time: f64::NAN,
        trough: f64::INFINITY,
        trough_time: f64::NAN,
    };
    let mut best_distance = f64::INFINITY;

    for point in window {
        let distance = (point.time - target).abs();
        if distance < best_distance {
            best_distance = distance;
            result.peak = point.concentration;
            result.peak_time = point.time;
        }
        if point.concentration < result.trough {
            result.trough = point.concentration;
            result.trough_time = point.time;
        }
    }

    result
}

/// Trapezoidal AUC (mg·h/L) of a curve between `start` and `end`
///
/// Boundaries that fall between samples are interpolated linearly.
pub fn auc_trapezoidal(curve: &ConcentrationCurve, start: f64, end: f64) -> f64 {
    auc::auc_interval(&curve.times(), &curve.concentrations(), start, end)
}

/// AUC over the first 24 hours (mg·h/L)
///
/// [`AucMethod::DoseOverCl`] is exact at steady state and ignores the curve;
/// [`AucMethod::Trapezoidal`] integrates the simulated curve over [0, 24] and so
/// reflects the exposure before steady state. The two are expected to differ.
pub fn compute_auc24(
    regimen: &Regimen,
    cl: f64,
    curve: &ConcentrationCurve,
    method: AucMethod,
) -> f64 {
    match method {
        AucMethod::DoseOverCl => regimen.daily_dose() / cl,
        AucMethod::Trapezoidal => auc_trapezoidal(curve, 0.0, 24.0),
    }
}

/// The metrics reported for one regimen and one set of parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Creatinine clearance (mL/min)
    pub crcl: f64,
    /// Volume of distribution (L)
    pub vd: f64,
    /// Clearance (L/h)
    pub cl: f64,
    /// Elimination rate constant (1/h)
    pub k: f64,
    /// Dosing weight (kg)
    pub weight_used: f64,
    /// mg/L
    pub peak: f64,
    /// mg/L
    pub trough: f64,
    /// mg·h/L
    pub auc24: f64,
}

impl DerivedMetrics {
    pub fn new(params: &PkParameters, peak: f64, trough: f64, auc24: f64) -> Self {
        DerivedMetrics {
            crcl: params.crcl,
            vd: params.vd,
            cl: params.cl,
            k: params.k,
            weight_used: params.weight_used,
            peak,
            trough,
            auc24,
        }
    }

    /// Whether peak and trough are the zeroed sentinel of an empty cycle window
    ///
    /// Such a result signals a horizon/interval misconfiguration upstream, not a
    /// clinical answer.
    pub fn is_sentinel(&self) -> bool {
        self.peak == 0.0 && self.trough == 0.0
    }

    pub fn half_life(&self) -> f64 {
        crate::parameters::half_life(self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeConcentrationPoint;
    use crate::simulator::{simulate, SimulationGrid};
    use approx::assert_relative_eq;

    fn sawtooth() -> ConcentrationCurve {
        // Two 4 h cycles, each rising for 1 h then decaying linearly
        [0.0, 10.0, 8.0, 6.0, 4.0, 14.0, 11.0, 9.0, 7.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| TimeConcentrationPoint::new(i as f64, c))
            .collect()
    }

    #[test]
    fn cycle_start_steps_back_from_incomplete_cycle() {
        assert_relative_eq!(last_cycle_start(48.0, 12.0), 36.0);
        assert_relative_eq!(last_cycle_start(48.0, 10.0), 30.0);
        assert_relative_eq!(last_cycle_start(50.0, 10.0), 40.0);
    }

    #[test]
    fn peak_and_trough_of_last_cycle() {
        let result = extract_peak_trough(&sawtooth(), 4.0, 1.0);
        // Window [4, 8): 4, 14, 11, 9
        assert_relative_eq!(result.peak, 14.0);
        assert_relative_eq!(result.peak_time, 5.0);
        assert_relative_eq!(result.trough, 4.0);
        assert_relative_eq!(result.trough_time, 4.0);
    }

    #[test]
    fn peak_uses_nearest_sample() {
        // End of infusion at 5.4 is nearest the sample at 5
        let result = extract_peak_trough(&sawtooth(), 4.0, 1.4);
        assert_relative_eq!(result.peak_time, 5.0);
    }

    #[test]
    fn interval_longer_than_curve_gives_sentinel() {
        let result = extract_peak_trough(&sawtooth(), 72.0, 1.0);
        assert!(result.is_sentinel());
    }

    #[test]
    fn non_positive_interval_gives_sentinel() {
        assert!(extract_peak_trough(&sawtooth(), 0.0, 1.0).is_sentinel());
        assert!(extract_peak_trough(&ConcentrationCurve::default(), 12.0, 1.0).is_sentinel());
    }

    #[test]
    fn simulated_peak_is_not_below_trough() {
        let regimen = Regimen::new(1250.0, 8.0, 90.0);
        let params = PkParameters::from_fit(80.0, 70.0, 0.08, 56.0);
        let curve = simulate(&regimen, &params, &SimulationGrid::default()).unwrap();
        let result = extract_peak_trough(&curve, 8.0, 1.5);
        assert!(!result.is_sentinel());
        assert!(result.peak >= result.trough);
        assert!(result.peak_time >= 40.0 && result.peak_time < 48.0);
    }

    #[test]
    fn trapezoidal_auc_interpolates_partial_segments() {
        let curve = sawtooth();
        // [0.5, 1.5]: c(0.5)=5, c(1)=10, c(1.5)=9 -> 3.75 + 4.75
        assert_relative_eq!(auc_trapezoidal(&curve, 0.5, 1.5), 8.5, epsilon = 1e-10);
    }

    #[test]
    fn auc24_methods() {
        let regimen = Regimen::new(1000.0, 12.0, 60.0);
        let curve = sawtooth();
        assert_relative_eq!(
            compute_auc24(&regimen, 2.0, &curve, AucMethod::DoseOverCl),
            1000.0
        );
        assert_relative_eq!(
            compute_auc24(&regimen, 2.0, &curve, AucMethod::Trapezoidal),
            auc::auc(&curve.times(), &curve.concentrations()),
            epsilon = 1e-10
        );
    }

    #[test]
    fn sentinel_metrics_are_recognised() {
        let params = PkParameters::from_fit(70.0, 87.5, 0.1, 49.0);
        assert!(DerivedMetrics::new(&params, 0.0, 0.0, 100.0).is_sentinel());
        assert!(!DerivedMetrics::new(&params, 20.0, 5.0, 100.0).is_sentinel());
    }
}
