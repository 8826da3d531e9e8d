pub mod auc;
pub mod curve;
pub mod level;
pub mod options;
pub mod patient;
pub mod regimen;
pub use curve::{ConcentrationCurve, TimeConcentrationPoint};
pub use level::{Level, LevelSet};
pub use options::*;
pub use patient::{Patient, Sex};
pub use regimen::Regimen;
