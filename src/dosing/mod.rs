//! Dose advice that does not need a simulated curve
pub mod loading;
pub mod recommend;

pub use loading::{
    capped_loading_dose, loading_dose, round_to_increment, DEFAULT_LOADING_MG_PER_KG,
    DOSE_INCREMENT,
};
pub use recommend::{
    infusion_minutes_for_dose, recommend_regimens, CandidateRegimen, Recommendation,
    RecommendationLimits, MAX_CANDIDATES,
};
