use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, VancoError};

/// A fixed intermittent infusion regimen
///
/// Every dose is the same amount, given at `interval` hours apart, each infused
/// over `infusion_minutes`. The first dose starts at time zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regimen {
    dose: f64,
    interval: f64,
    infusion_minutes: f64,
}

impl Regimen {
    /// Create a new regimen
    ///
    /// # Arguments
    ///
    /// * `dose` - Amount per dose in mg
    /// * `interval` - Dosing interval in hours
    /// * `infusion_minutes` - Duration of each infusion in minutes
    pub fn new(dose: f64, interval: f64, infusion_minutes: f64) -> Self {
        Regimen {
            dose,
            interval,
            infusion_minutes,
        }
    }

    /// Amount per dose (mg)
    pub fn dose(&self) -> f64 {
        self.dose
    }

    /// Dosing interval (h)
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Infusion duration (min)
    pub fn infusion_minutes(&self) -> f64 {
        self.infusion_minutes
    }

    /// Infusion duration (h)
    pub fn infusion_hours(&self) -> f64 {
        self.infusion_minutes / 60.0
    }

    /// Infusion rate (mg/h)
    pub fn infusion_rate(&self) -> f64 {
        self.dose / self.infusion_hours()
    }

    pub fn doses_per_day(&self) -> f64 {
        24.0 / self.interval
    }

    /// Total amount given over 24 hours (mg)
    pub fn daily_dose(&self) -> f64 {
        self.dose * self.doses_per_day()
    }

    /// Start time of the dose with the given zero-based index (h)
    pub fn dose_time(&self, index: usize) -> f64 {
        index as f64 * self.interval
    }

    /// Check that all fields are finite and strictly positive
    ///
    /// The simulator divides by both the interval and the infusion duration, so
    /// callers should reject invalid regimens before reaching it.
    pub fn validate(&self) -> Result<(), VancoError> {
        ensure_positive("dose", self.dose)?;
        ensure_positive("interval", self.interval)?;
        ensure_positive("infusion_minutes", self.infusion_minutes)?;
        Ok(())
    }
}
