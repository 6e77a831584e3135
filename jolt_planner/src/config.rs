//! Planner configuration: shared settings, axis limits and a list of moves.
//!
//! ```toml
//! [shared]
//! service_name = "jolt-planner"
//!
//! [limits]
//! v_max = 2.0
//! a_max = 1.0
//! j_max = 2.0
//!
//! [[move]]
//! name = "approach"
//! start = { p = 0.0 }
//! goal = { p = 10.0 }
//! duration = 9.0
//! ```

use std::collections::HashSet;
use std::path::Path;

use jolt_common::config::{ConfigError, ConfigLoader, SharedConfig};
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use serde::Deserialize;

/// Axis limits as written in TOML; `v_min` defaults to `-v_max`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub v_max: f64,
    #[serde(default)]
    pub v_min: Option<f64>,
    pub a_max: f64,
    pub j_max: f64,
}

impl LimitsConfig {
    pub fn to_limits(&self) -> KinematicLimits {
        KinematicLimits {
            v_max: self.v_max,
            v_min: self.v_min.unwrap_or(-self.v_max),
            a_max: self.a_max,
            j_max: self.j_max,
        }
    }
}

/// One move to plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveConfig {
    pub name: String,
    pub start: KinematicState,
    pub goal: KinematicState,
    /// Requested total duration [s]; the minimum duration when absent.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    pub shared: SharedConfig,
    pub limits: LimitsConfig,
    #[serde(rename = "move", default)]
    pub moves: Vec<MoveConfig>,
}

impl PlannerConfig {
    /// Validate shared settings, limits, states, names and durations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.limits
            .to_limits()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let mut names = HashSet::new();
        for mv in &self.moves {
            if mv.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "move name cannot be empty".to_string(),
                ));
            }
            if !names.insert(mv.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate move name '{}'",
                    mv.name
                )));
            }
            for (label, state) in [("start", &mv.start), ("goal", &mv.goal)] {
                state
                    .validate(label)
                    .map_err(|e| ConfigError::ValidationError(format!("move '{}': {e}", mv.name)))?;
            }
            if let Some(duration) = mv.duration
                && !(duration.is_finite() && duration >= 0.0)
            {
                return Err(ConfigError::ValidationError(format!(
                    "move '{}': duration must be finite and non-negative, got {duration}",
                    mv.name
                )));
            }
        }
        Ok(())
    }

    /// Move with the given name.
    pub fn find_move(&self, name: &str) -> Option<&MoveConfig> {
        self.moves.iter().find(|mv| mv.name == name)
    }
}

/// Load and validate a planner configuration file.
pub fn load_config(path: &Path) -> Result<PlannerConfig, ConfigError> {
    let config = PlannerConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate planner configuration text.
pub fn load_config_from_str(content: &str) -> Result<PlannerConfig, ConfigError> {
    let config = PlannerConfig::load_str(content)?;
    config.validate()?;
    Ok(config)
}
