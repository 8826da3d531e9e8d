//! Calculation options
//!
//! [`Options`] is passed explicitly to every calculation. Its [`Default`] holds the
//! population defaults: total body weight, unadjusted serum creatinine,
//! Vd 0.7 L/kg, identity clearance calibration, AUC24 from dose/CL and a
//! 48 h simulation sampled every 0.1 h.

use serde::{Deserialize, Serialize};

use crate::simulator::SimulationGrid;

/// Which body weight feeds Cockcroft-Gault and the volume of distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightStrategy {
    /// Total (actual) body weight
    #[default]
    Total,
    /// Ideal body weight (Devine)
    Ideal,
    /// Adjusted body weight, IBW + 0.4 * (TBW - IBW)
    Adjusted,
    /// TBW if underweight, AdjBW if BMI >= 30, otherwise IBW
    Auto,
}

/// How serum creatinine is treated before Cockcroft-Gault
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrPolicy {
    /// Use the measured value
    #[default]
    #[serde(rename = "none")]
    AsMeasured,
    /// Raise the measured value to at least this floor (mg/dL)
    Floor(f64),
}

impl ScrPolicy {
    /// Serum creatinine after the policy is applied
    pub fn apply(&self, scr: f64) -> f64 {
        match self {
            ScrPolicy::AsMeasured => scr,
            ScrPolicy::Floor(floor) => scr.max(*floor),
        }
    }
}

/// Where creatinine clearance comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrclSource {
    /// Cockcroft-Gault on the dosing weight and the policy-adjusted creatinine
    #[default]
    CockcroftGault,
    /// A clearance (mL/min) supplied by the clinician, e.g. from a timed urine collection
    Forced(f64),
}

/// How AUC over the first 24 hours is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AucMethod {
    /// Daily dose / CL, the steady-state closed form
    #[default]
    DoseOverCl,
    /// Trapezoidal integration of the simulated curve over [0, 24]
    Trapezoidal,
}

/// Shape of the rise during infusion in curves reconstructed from levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InfusionShape {
    /// First-order rise, consistent with the simulator
    #[default]
    Exponential,
    /// Straight line from zero to the peak
    LinearRamp,
}

/// How two or more levels are reduced to an elimination rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MultiLevelFit {
    /// Slope between the earliest and the latest level; intermediate levels are ignored
    #[default]
    EndPoints,
    /// Least-squares line through ln(concentration) of every level
    LogLinearRegression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub weight_strategy: WeightStrategy,
    pub scr_policy: ScrPolicy,
    pub crcl_source: CrclSource,
    pub auc_method: AucMethod,
    /// Population volume of distribution (L/kg)
    pub vd_per_kg: f64,
    /// Added to CrCl-derived clearance (L/h)
    pub cl_offset: f64,
    /// Multiplies CrCl-derived clearance
    pub cl_scale: f64,
    pub grid: SimulationGrid,
    pub levels_infusion: InfusionShape,
    pub multi_level_fit: MultiLevelFit,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            weight_strategy: WeightStrategy::Total,
            scr_policy: ScrPolicy::AsMeasured,
            crcl_source: CrclSource::CockcroftGault,
            auc_method: AucMethod::DoseOverCl,
            vd_per_kg: 0.7,
            cl_offset: 0.0,
            cl_scale: 1.0,
            grid: SimulationGrid::default(),
            levels_infusion: InfusionShape::Exponential,
            multi_level_fit: MultiLevelFit::EndPoints,
        }
    }
}

impl Options {
    pub fn with_weight_strategy(mut self, strategy: WeightStrategy) -> Self {
        self.weight_strategy = strategy;
        self
    }

    pub fn with_scr_policy(mut self, policy: ScrPolicy) -> Self {
        self.scr_policy = policy;
        self
    }

    pub fn with_crcl_source(mut self, source: CrclSource) -> Self {
        self.crcl_source = source;
        self
    }

    pub fn with_auc_method(mut self, method: AucMethod) -> Self {
        self.auc_method = method;
        self
    }

    pub fn with_vd_per_kg(mut self, vd_per_kg: f64) -> Self {
        self.vd_per_kg = vd_per_kg;
        self
    }

    /// Set the clearance calibration, CL = offset + scale * CrCl / 60
    pub fn with_clearance_calibration(mut self, offset: f64, scale: f64) -> Self {
        self.cl_offset = offset;
        self.cl_scale = scale;
        self
    }

    pub fn with_grid(mut self, grid: SimulationGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_levels_infusion(mut self, shape: InfusionShape) -> Self {
        self.levels_infusion = shape;
        self
    }

    pub fn with_multi_level_fit(mut self, fit: MultiLevelFit) -> Self {
        self.multi_level_fit = fit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scr_floor_only_raises() {
        assert_eq!(ScrPolicy::Floor(1.0).apply(0.6), 1.0);
        assert_eq!(ScrPolicy::Floor(1.0).apply(1.4), 1.4);
        assert_eq!(ScrPolicy::AsMeasured.apply(0.6), 0.6);
    }

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.weight_strategy, WeightStrategy::Total);
        assert_eq!(options.auc_method, AucMethod::DoseOverCl);
        assert_eq!(options.vd_per_kg, 0.7);
        assert_eq!(options.cl_offset, 0.0);
        assert_eq!(options.cl_scale, 1.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"weight_strategy":"auto","scr_policy":{"floor":0.8}}"#)
                .unwrap();
        assert_eq!(options.weight_strategy, WeightStrategy::Auto);
        assert_eq!(options.scr_policy, ScrPolicy::Floor(0.8));
        assert_eq!(options.vd_per_kg, 0.7);
    }

    #[test]
    fn forced_crcl_deserializes_from_a_table() {
        let options: Options = serde_json::from_str(r#"{"crcl_source":{"forced":42.0}}"#).unwrap();
        assert_eq!(options.crcl_source, CrclSource::Forced(42.0));
        assert_eq!(Options::default().crcl_source, CrclSource::CockcroftGault);
    }

    #[test]
    fn scr_policy_none_round_trips_by_name() {
        let policy: ScrPolicy = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(policy, ScrPolicy::AsMeasured);
    }
}
