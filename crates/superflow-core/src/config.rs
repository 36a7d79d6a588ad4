//! Scenario configuration: geometry, hydraulics and a target flow rate.
//!
//! Scenarios are stored as JSON. Missing fields fall back to the reference
//! cross-section, so a file only needs the values that differ.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FLOW_RATE;
use crate::geometry::Geometry;
use crate::params::HydraulicParameters;

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Invalid(#[from] crate::error::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub geometry: Geometry,

    #[serde(default)]
    pub hydraulics: HydraulicParameters,

    /// Target flow rate [m3/s].
    #[serde(default = "default_flow_rate")]
    pub flow_rate: f64,
}

fn default_flow_rate() -> f64 {
    DEFAULT_FLOW_RATE
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            hydraulics: HydraulicParameters::default(),
            flow_rate: default_flow_rate(),
        }
    }
}

impl Scenario {
    /// Load and validate a scenario from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let scenario: Scenario =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.hydraulics.validate()?;
        if !self.flow_rate.is_finite() || self.flow_rate < 0.0 {
            return Err(crate::error::Error::InvalidFlowRate(self.flow_rate).into());
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
