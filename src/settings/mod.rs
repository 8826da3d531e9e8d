//! Settings read from TOML and the environment
//!
//! Entries in the TOML file may be overridden by environment variables prefixed
//! with `VANCOPK_`. Nested entries are separated by a double underscore, so
//! `VANCOPK_OPTIONS__VD_PER_KG=0.65` overrides `options.vd_per_kg`. Every entry
//! is optional and falls back to its default.

use config::Config as eConfig;
use serde::{Deserialize, Serialize};

use crate::data::{CrclSource, Options};
use crate::dosing::RecommendationLimits;
use crate::error::{ensure_positive, VancoError};
use crate::simulator::SimulationGrid;

const ENV_PREFIX: &str = "VANCOPK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Calculation options passed to the engine
    pub options: Options,
    /// Log filter for [`crate::logger::setup_log`]
    pub log_level: String,
    /// Regimen search guardrails
    pub limits: RecommendationLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            options: Options::default(),
            log_level: "info".to_string(),
            limits: RecommendationLimits::default(),
        }
    }
}

impl Settings {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), VancoError> {
        SimulationGrid::new(self.options.grid.horizon, self.options.grid.step)?;
        ensure_positive("options.vd_per_kg", self.options.vd_per_kg)?;
        if let CrclSource::Forced(crcl) = self.options.crcl_source {
            ensure_positive("options.crcl_source", crcl)?;
        }
        self.limits.validate()
    }
}

fn build(source: impl config::Source + Send + Sync + 'static) -> Result<Settings, VancoError> {
    let parsed = eConfig::builder()
        .add_source(source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = parsed.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(
        weight_strategy = ?settings.options.weight_strategy,
        auc_method = ?settings.options.auc_method,
        horizon = settings.options.grid.horizon,
        "Settings loaded"
    );
    Ok(settings)
}

/// Parse settings from a TOML file, layered with `VANCOPK_` environment variables
pub fn read_settings(path: impl Into<String>) -> Result<Settings, VancoError> {
    let settings_path = path.into();
    build(config::File::with_name(&settings_path).format(config::FileFormat::Toml))
}

/// Parse settings from TOML text, layered with `VANCOPK_` environment variables
pub fn parse_settings(toml: &str) -> Result<Settings, VancoError> {
    build(config::File::from_str(toml, config::FileFormat::Toml))
}
