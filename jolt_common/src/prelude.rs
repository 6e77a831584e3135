//! Prelude module for common re-exports.
//!
//! ```rust
//! use jolt_common::prelude::*;
//! ```

// ─── Kinematics ─────────────────────────────────────────────────────
pub use crate::kinematics::{KinematicLimits, KinematicState};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::TrajectoryError;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Solver Constants ───────────────────────────────────────────────
pub use crate::consts::MAX_VALID_PROFILES;
