//! Boundary states and kinematic limits of a single axis.

use serde::{Deserialize, Serialize};

use crate::error::TrajectoryError;

/// Position, velocity and acceleration of one axis at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position [unit].
    pub p: f64,
    /// Velocity [unit/s].
    #[serde(default)]
    pub v: f64,
    /// Acceleration [unit/s²].
    #[serde(default)]
    pub a: f64,
}

impl KinematicState {
    /// State with the given position, velocity and acceleration.
    #[inline]
    pub const fn new(p: f64, v: f64, a: f64) -> Self {
        Self { p, v, a }
    }

    /// Standstill at position `p`.
    #[inline]
    pub const fn at_rest(p: f64) -> Self {
        Self { p, v: 0.0, a: 0.0 }
    }

    /// Returns true if all components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p.is_finite() && self.v.is_finite() && self.a.is_finite()
    }

    /// Reject non-finite components, naming the offending state.
    ///
    /// # Errors
    ///
    /// Returns `TrajectoryError::InvalidInput` if any component is NaN or infinite.
    pub fn validate(&self, name: &str) -> Result<(), TrajectoryError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(TrajectoryError::InvalidInput(format!(
                "{name} state must be finite, got p={}, v={}, a={}",
                self.p, self.v, self.a
            )))
        }
    }
}

/// Velocity, acceleration and jerk limits of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    /// Maximum velocity [unit/s].
    pub v_max: f64,
    /// Minimum velocity [unit/s] (usually `-v_max`).
    pub v_min: f64,
    /// Maximum absolute acceleration [unit/s²].
    pub a_max: f64,
    /// Maximum absolute jerk [unit/s³].
    pub j_max: f64,
}

impl KinematicLimits {
    /// Limits with `v_min = -v_max`.
    #[inline]
    pub const fn symmetric(v_max: f64, a_max: f64, j_max: f64) -> Self {
        Self {
            v_max,
            v_min: -v_max,
            a_max,
            j_max,
        }
    }

    /// Validate the limits.
    ///
    /// # Errors
    ///
    /// Returns `TrajectoryError::InvalidInput` if:
    /// - any limit is not finite
    /// - `a_max` or `j_max` is not strictly positive
    /// - `v_min > v_max`
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        let all_finite = [self.v_max, self.v_min, self.a_max, self.j_max]
            .iter()
            .all(|x| x.is_finite());
        if !all_finite {
            return Err(TrajectoryError::InvalidInput(
                "limits must be finite".to_string(),
            ));
        }
        if self.a_max <= 0.0 {
            return Err(TrajectoryError::InvalidInput(format!(
                "a_max must be positive, got {}",
                self.a_max
            )));
        }
        if self.j_max <= 0.0 {
            return Err(TrajectoryError::InvalidInput(format!(
                "j_max must be positive, got {}",
                self.j_max
            )));
        }
        if self.v_min > self.v_max {
            return Err(TrajectoryError::InvalidInput(format!(
                "v_min ({}) must not exceed v_max ({})",
                self.v_min, self.v_max
            )));
        }
        Ok(())
    }
}
