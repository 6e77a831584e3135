//! Solver-wide constants for the jolt workspace.
//!
//! Single source of truth for numeric tolerances and fixed capacities.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Maximum number of valid candidate profiles kept by the minimum-time solver.
///
/// One minimum plus the two endpoints of at most two blocked intervals, plus
/// one spare for numerical duplicates.
pub const MAX_VALID_PROFILES: usize = 6;

/// Near-zero threshold used by the brake pre-trajectory.
pub const BRAKE_EPS: f64 = 2e-14;

/// Negative phase durations down to `-TIME_EPS` are clamped to zero.
pub const TIME_EPS: f64 = 1e-12;

/// Allowed final position error [unit].
pub const P_PRECISION: f64 = 1e-8;

/// Allowed final velocity error [unit/s].
pub const V_PRECISION: f64 = 1e-8;

/// Allowed final acceleration error [unit/s²].
pub const A_PRECISION: f64 = 1e-10;

/// Allowed deviation of a fixed-duration profile from its target [s].
pub const T_PRECISION: f64 = 1e-8;

/// Allowed overshoot of a kinematic limit inside a profile.
pub const LIMIT_EPS: f64 = 1e-10;

/// Candidates whose durations differ by less than this (relative) are duplicates.
///
/// Roots of multiplicity two are only resolved to about the square root of the
/// machine precision, so one profile can arrive twice a few 1e-9 apart.
pub const DUPLICATE_EPS: f64 = 1e-7;

/// Boundary states closer than this (relative) count as identical.
pub const STANDSTILL_EPS: f64 = 1e-12;

const_assert!(MAX_VALID_PROFILES >= 5);
const_assert!(MAX_VALID_PROFILES % 2 == 0);

/// Scale a precision by the magnitude of the quantity it guards.
///
/// Values below one keep the absolute precision.
#[inline]
pub fn scaled(precision: f64, magnitude: f64) -> f64 {
    precision * magnitude.abs().max(1.0)
}
