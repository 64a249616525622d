//! Interpreter configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables shared by every program a host creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Simulated seconds one tick stands for. `wait` converts its duration
    /// into ticks with this, and [`crate::Program::run_for`] converts real
    /// time into ticks with it.
    pub seconds_per_tick: f64,
    /// Seed for `random`, so runs are reproducible.
    pub rng_seed: u64,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            seconds_per_tick: 0.001,
            rng_seed: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seconds_per_tick must be a positive number, got {0}")]
    InvalidTickLength(f64),
}

impl ProgramConfig {
    /// Parse a config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ProgramConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seconds_per_tick.is_finite() && self.seconds_per_tick > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidTickLength(self.seconds_per_tick))
        }
    }

    /// Number of ticks a `wait` of `seconds` lasts. Negative and non-finite
    /// durations last zero ticks.
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        let ticks = (seconds / self.seconds_per_tick).round();
        if ticks.is_finite() && ticks > 0.0 {
            ticks as u64
        } else {
            0
        }
    }
}
