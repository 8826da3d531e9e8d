pub mod data;
pub mod dosing;
pub mod engine;
pub mod error;
pub mod levels;
pub mod logger;
pub mod metrics;
pub mod parameters;
pub mod renal;
pub mod safety;
pub mod settings;
pub mod simulator;

pub use crate::data::*;
pub use crate::engine::{calculate_deterministic, DeterministicResult};
pub use crate::levels::{calculate_from_levels, LevelsMethod, LevelsResult};
pub use crate::metrics::DerivedMetrics;
pub use crate::parameters::PkParameters;
pub use error::VancoError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            ConcentrationCurve, Level, LevelSet, Options, Patient, Regimen, Sex,
            TimeConcentrationPoint,
        };
    }
    pub mod options {
        pub use crate::data::{
            AucMethod, CrclSource, InfusionShape, MultiLevelFit, ScrPolicy, WeightStrategy,
        };
        pub use crate::simulator::SimulationGrid;
    }
    pub mod dosing {
        pub use crate::dosing::{
            capped_loading_dose, loading_dose, recommend_regimens, Recommendation,
            RecommendationLimits, DEFAULT_LOADING_MG_PER_KG,
        };
    }

    pub use crate::data::*;
    pub use crate::engine::{calculate_deterministic, DeterministicResult};
    pub use crate::error::VancoError;
    pub use crate::levels::{calculate_from_levels, LevelsMethod, LevelsResult};
    pub use crate::metrics::DerivedMetrics;
    pub use crate::parameters::PkParameters;
    pub use crate::safety::SafetyWarning;
    pub use crate::simulator::{simulate, SimulationGrid};
}
