//! Brake pre-trajectory.
//!
//! When the initial velocity or acceleration already violates the limits (or
//! the velocity will overshoot before the acceleration can be ramped to zero),
//! up to two phases of constant jerk bring the state back inside
//! `[v_min, v_max]` and `|a| ≤ a_max`. The solvers then start from the
//! post-brake state.
//!
//! The lower-bound cases reuse the upper-bound formulas with mirrored
//! arguments: velocity bounds swapped, `a_max` and `j_max` negated.

use jolt_common::consts::BRAKE_EPS;
use jolt_common::kinematics::KinematicLimits;

use crate::profile::Profile;

/// Two brake phases; zero durations mean the phase is not needed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrakeTrajectory {
    /// Phase durations [s].
    pub t: [f64; 2],
    /// Phase jerks.
    pub j: [f64; 2],
}

impl BrakeTrajectory {
    #[inline]
    pub fn duration(&self) -> f64 {
        self.t[0] + self.t[1]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.duration() <= 0.0
    }
}

/// Brake needed before a profile can start at `(v0, a0)`.
pub fn get_brake_trajectory(v0: f64, a0: f64, limits: &KinematicLimits) -> BrakeTrajectory {
    let KinematicLimits {
        v_max,
        v_min,
        a_max,
        j_max,
    } = *limits;

    if a0 > a_max {
        acceleration_brake(v0, a0, v_max, v_min, a_max, j_max)
    } else if a0 < -a_max {
        acceleration_brake(v0, a0, v_min, v_max, -a_max, -j_max)
    } else if v0 > v_max || (a0 > 0.0 && velocity_at_zero_acceleration(v0, a0, j_max) > v_max) {
        velocity_brake(v0, a0, v_max, v_min, a_max, j_max)
    } else if v0 < v_min || (a0 < 0.0 && velocity_at_zero_acceleration(v0, a0, -j_max) < v_min) {
        velocity_brake(v0, a0, v_min, v_max, -a_max, -j_max)
    } else {
        BrakeTrajectory::default()
    }
}

/// Velocity once `a0` has been ramped to zero with jerk `-j`.
#[inline]
fn velocity_at_zero_acceleration(v0: f64, a0: f64, j: f64) -> f64 {
    v0 + a0 * a0 / (2.0 * j)
}

/// `v` lies beyond `bound` on the side selected by the sign of `j`.
#[inline]
fn beyond(v: f64, bound: f64, j: f64) -> bool {
    if j > 0.0 { v > bound } else { v < bound }
}

/// Acceleration beyond `a_max`: ramp it back with jerk `-j_max`.
fn acceleration_brake(
    v0: f64,
    a0: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    j_max: f64,
) -> BrakeTrajectory {
    let mut brake = BrakeTrajectory {
        t: [0.0; 2],
        j: [-j_max, 0.0],
    };

    let t_to_a_max = (a0 - a_max) / j_max;
    let t_to_a_zero = a0 / j_max;

    let (_, v_at_a_max, _) = Profile::integrate(t_to_a_max, 0.0, v0, a0, -j_max);
    let (_, v_at_a_zero, _) = Profile::integrate(t_to_a_zero, 0.0, v0, a0, -j_max);

    if beyond(v_at_a_zero, v_max, j_max) {
        return velocity_brake(v0, a0, v_max, v_min, a_max, j_max);
    }

    brake.t[0] = t_to_a_max.max(0.0);
    if beyond(v_min, v_at_a_max, j_max) {
        // Still short of the opposite bound: hold a_max, but leave room to ramp
        // the acceleration to zero without passing v_max.
        let t_to_v_min = (v_min - v_at_a_max) / a_max;
        let t_to_v_max = (v_max - v_at_a_max) / a_max - a_max / (2.0 * j_max);
        brake.t[1] = t_to_v_min.min(t_to_v_max).max(0.0);
    }
    brake
}

/// Velocity beyond (or about to pass) `v_max`: jerk `-j_max` until it is back,
/// holding `-a_max` if the acceleration limit comes first.
fn velocity_brake(
    v0: f64,
    a0: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    j_max: f64,
) -> BrakeTrajectory {
    let mut brake = BrakeTrajectory {
        t: [0.0; 2],
        j: [-j_max, 0.0],
    };

    let t_to_a_max = (a0 + a_max) / j_max;
    let radicand = a0 * a0 + 2.0 * j_max * (v0 - v_max);
    let t_to_v_max = a0 / j_max + radicand.max(0.0).sqrt() / j_max.abs();

    if t_to_a_max < t_to_v_max {
        let (_, v_at_a_max, _) = Profile::integrate(t_to_a_max, 0.0, v0, a0, -j_max);
        let t_hold_to_v_max = (v_at_a_max - v_max) / a_max;
        // Ramping -a_max back to zero drops the velocity by a_max²/(2 j_max).
        let t_hold_to_v_min = (v_at_a_max - v_min) / a_max - a_max / (2.0 * j_max);

        brake.t[0] = t_to_a_max.max(0.0);
        brake.t[1] = t_hold_to_v_max.min(t_hold_to_v_min).max(0.0);
    } else {
        brake.t[0] = t_to_v_max.max(0.0);
    }

    for t in brake.t.iter_mut() {
        if *t < BRAKE_EPS {
            *t = 0.0;
        }
    }
    brake
}
