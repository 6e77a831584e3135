//! Trajectory planning error type.
//!
//! The solvers themselves report infeasibility through `Option`; this type is
//! raised by the planning layer for malformed input and for results the caller
//! asked for but cannot have.

use thiserror::Error;

/// Error type for single-axis trajectory planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// Limits or boundary states are malformed (non-finite, non-positive, inverted).
    #[error("Invalid trajectory input: {0}")]
    InvalidInput(String),

    /// No direction/case combination yields a valid profile.
    #[error("No valid profile exists for the given boundary states and limits")]
    Infeasible,

    /// The requested duration lies below the minimum or inside a blocked interval.
    #[error("Duration {duration} s is blocked (minimum duration {t_min} s)")]
    DurationBlocked {
        /// Requested total duration [s].
        duration: f64,
        /// Minimum feasible duration [s].
        t_min: f64,
    },

    /// The fixed-duration solver found no profile for a duration that is not blocked.
    #[error("No profile matches the requested duration of {0} s")]
    NoProfileForDuration(f64),
}
