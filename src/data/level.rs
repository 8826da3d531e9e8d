use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, VancoError};

/// A measured drug concentration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    time: f64,
    concentration: f64,
    dose_index: Option<usize>,
}

impl Level {
    /// Create a new level
    ///
    /// # Arguments
    ///
    /// * `time` - Time since the start of the dose (h)
    /// * `concentration` - Observed concentration (mg/L)
    pub fn new(time: f64, concentration: f64) -> Self {
        Level {
            time,
            concentration,
            dose_index: None,
        }
    }

    /// Record which dose (zero-indexed) the level was drawn after
    pub fn with_dose_index(mut self, index: usize) -> Self {
        self.dose_index = Some(index);
        self
    }

    /// Time since the start of the dose (h)
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Observed concentration (mg/L)
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn dose_index(&self) -> Option<usize> {
        self.dose_index
    }

    pub fn validate(&self) -> Result<(), VancoError> {
        if !(self.time.is_finite() && self.time >= 0.0) {
            return Err(VancoError::invalid_input("level time", self.time));
        }
        ensure_positive("level concentration", self.concentration)
    }
}

/// Measured levels, classified once by how many are available
///
/// [`LevelSet::MultiLevel`] always holds at least two levels, sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSet {
    NoLevels,
    SingleLevel(Level),
    MultiLevel(Vec<Level>),
}

impl LevelSet {
    pub fn from_levels(levels: &[Level]) -> Self {
        match levels {
            [] => LevelSet::NoLevels,
            [single] => LevelSet::SingleLevel(single.clone()),
            _ => {
                let mut sorted = levels.to_vec();
                sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
                LevelSet::MultiLevel(sorted)
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LevelSet::NoLevels => 0,
            LevelSet::SingleLevel(_) => 1,
            LevelSet::MultiLevel(levels) => levels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LevelSet::NoLevels)
    }
}

impl From<Vec<Level>> for LevelSet {
    fn from(levels: Vec<Level>) -> Self {
        LevelSet::from_levels(&levels)
    }
}
