//! Single-axis profile solvers.
//!
//! - [`Step1`]: all valid profiles of minimum-time type, condensed into a [`Block`](crate::block::Block)
//! - [`Step2`]: one profile of a prescribed duration
//!
//! Both walk the eight [`Limits`](crate::profile::Limits) cases for each
//! [`Heading`], VEL cases first. A case either has closed-form phase durations
//! or is a one-parameter family solved through the `parametric` module.

mod parametric;
pub mod step1;
pub mod step2;

pub use step1::Step1;
pub use step2::Step2;

use jolt_common::consts::TIME_EPS;
use jolt_common::kinematics::{KinematicLimits, KinematicState};

use crate::profile::{Direction, Teeth};

/// Limits seen from one direction of the first jerk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Heading {
    pub direction: Direction,
    /// First-phase jerk.
    pub j: f64,
    /// Acceleration plateau of the first segment.
    pub a: f64,
    /// Cruise velocity.
    pub v: f64,
}

impl Heading {
    pub fn up(limits: &KinematicLimits) -> Self {
        Self {
            direction: Direction::Up,
            j: limits.j_max,
            a: limits.a_max,
            v: limits.v_max,
        }
    }

    pub fn down(limits: &KinematicLimits) -> Self {
        Self {
            direction: Direction::Down,
            j: -limits.j_max,
            a: -limits.a_max,
            v: limits.v_min,
        }
    }

    /// Up first, then down.
    pub fn both(limits: &KinematicLimits) -> [Self; 2] {
        [Self::up(limits), Self::down(limits)]
    }

    /// Jerk opening the second segment (phase 4).
    #[inline]
    pub fn j2(&self, teeth: Teeth) -> f64 {
        match teeth {
            Teeth::Uddu => -self.j,
            Teeth::Udud => self.j,
        }
    }

    /// Acceleration plateau of the second segment.
    #[inline]
    pub fn a2(&self, teeth: Teeth) -> f64 {
        match teeth {
            Teeth::Uddu => -self.a,
            Teeth::Udud => self.a,
        }
    }
}

/// Boundary expressions shared by the case functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Derived {
    /// `pf − p0`
    pub pd: f64,
    /// `vf − v0`
    pub vd: f64,
    pub a0_a0: f64,
    pub af_af: f64,
    pub a_max_a_max: f64,
    /// `a0 + af`
    pub a_sum: f64,
}

impl Derived {
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        Self {
            pd: goal.p - start.p,
            vd: goal.v - start.v,
            a0_a0: start.a * start.a,
            af_af: goal.a * goal.a,
            a_max_a_max: limits.a_max * limits.a_max,
            a_sum: start.a + goal.a,
        }
    }
}

/// Phases 0..=2: from `(v0, a0)` to `(v_peak, 0)` with first jerk `j`.
///
/// With a `plateau` the acceleration holds that value in phase 1, otherwise
/// the peak acceleration follows from `v_peak`.
pub(crate) fn ramp_up(v0: f64, a0: f64, v_peak: f64, j: f64, plateau: Option<f64>) -> Option<[f64; 3]> {
    match plateau {
        Some(a) => Some([
            (a - a0) / j,
            (v_peak - v0 - (2.0 * a * a - a0 * a0) / (2.0 * j)) / a,
            a / j,
        ]),
        None => {
            let peak = signed_root(j * (v_peak - v0) + a0 * a0 / 2.0, j, a0 * a0)?;
            Some([(peak - a0) / j, 0.0, peak / j])
        }
    }
}

/// Phases 4..=6: from `(v_peak, 0)` to `(vf, af)` with phase-4 jerk `j`.
pub(crate) fn ramp_down(v_peak: f64, vf: f64, af: f64, j: f64, plateau: Option<f64>) -> Option<[f64; 3]> {
    match plateau {
        Some(a) => Some([
            a / j,
            (vf - v_peak - (2.0 * a * a - af * af) / (2.0 * j)) / a,
            (a - af) / j,
        ]),
        None => {
            let peak = signed_root(j * (vf - v_peak) + af * af / 2.0, j, af * af)?;
            Some([peak / j, 0.0, (peak - af) / j])
        }
    }
}

/// `sign(j)·√square`, tolerating rounding below zero relative to `scale`.
fn signed_root(square: f64, j: f64, scale: f64) -> Option<f64> {
    if square < -1e-12 * scale.max(1.0) {
        return None;
    }
    Some(j.signum() * square.max(0.0).sqrt())
}

/// Phase durations that cannot be valid.
#[inline]
pub(crate) fn any_negative(t: &[f64]) -> bool {
    t.iter().any(|&t| t.is_nan() || t < -TIME_EPS)
}
