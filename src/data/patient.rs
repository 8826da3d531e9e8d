use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ensure_positive, VancoError};

/// Biological sex, as used by the Cockcroft-Gault and ideal body weight equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Patient demographics
///
/// Units follow the clinical convention of the dosing tables:
/// age in years, weight in kg, height in cm and serum creatinine in mg/dL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    age: f64,
    sex: Sex,
    weight: f64,
    height: f64,
    scr: f64,
}

impl Patient {
    /// Create a new patient
    ///
    /// # Arguments
    ///
    /// * `age` - Age in years
    /// * `sex` - Biological sex
    /// * `weight` - Total body weight in kg
    /// * `height` - Height in cm
    /// * `scr` - Serum creatinine in mg/dL
    pub fn new(age: f64, sex: Sex, weight: f64, height: f64, scr: f64) -> Self {
        Patient {
            age,
            sex,
            weight,
            height,
            scr,
        }
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Total body weight (kg)
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Height (cm)
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Serum creatinine (mg/dL)
    pub fn scr(&self) -> f64 {
        self.scr
    }

    /// Check that all fields are finite and strictly positive
    ///
    /// The calculation functions do not call this themselves.
    pub fn validate(&self) -> Result<(), VancoError> {
        ensure_positive("age", self.age)?;
        ensure_positive("weight", self.weight)?;
        ensure_positive("height", self.height)?;
        ensure_positive("scr", self.scr)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_serializes_lowercase() {
        let json = serde_json::to_string(&Sex::Female).unwrap();
        assert_eq!(json, "\"female\"");
    }

    #[test]
    fn validate_rejects_zero_weight() {
        let patient = Patient::new(50.0, Sex::Male, 0.0, 170.0, 1.0);
        assert!(matches!(
            patient.validate(),
            Err(VancoError::InvalidInput { ref field, .. }) if field == "weight"
        ));
    }

    #[test]
    fn validate_accepts_typical_adult() {
        let patient = Patient::new(50.0, Sex::Male, 70.0, 170.0, 1.0);
        assert!(patient.validate().is_ok());
    }
}
