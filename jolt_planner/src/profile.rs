//! Seven-phase piecewise-constant-jerk profile of a single axis.
//!
//! A profile is built by a case function of [`Step1`](crate::solver::Step1)
//! or [`Step2`](crate::solver::Step2) from seven phase durations and jerks,
//! validated once with [`Profile::check`] and read-only afterwards.

use bitflags::bitflags;
use core::fmt;
use jolt_common::consts::{
    A_PRECISION, LIMIT_EPS, P_PRECISION, TIME_EPS, V_PRECISION, scaled,
};
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use serde::Serialize;

use crate::brake::BrakeTrajectory;

bitflags! {
    /// Kinematic limits reached by a profile.
    ///
    /// The eight combinations are the eight cases of the solvers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Limits: u8 {
        /// Acceleration plateau in the first segment.
        const ACC0 = 0b001;
        /// Acceleration plateau in the second segment.
        const ACC1 = 0b010;
        /// Constant-velocity cruise between the segments.
        const VEL  = 0b100;
    }
}

impl Limits {
    /// No limit reached.
    pub const NONE: Self = Self::empty();
    pub const ACC0_ACC1: Self = Self::from_bits_truncate(Self::ACC0.bits() | Self::ACC1.bits());
    pub const ACC0_VEL: Self = Self::from_bits_truncate(Self::ACC0.bits() | Self::VEL.bits());
    pub const ACC1_VEL: Self = Self::from_bits_truncate(Self::ACC1.bits() | Self::VEL.bits());
    pub const ACC0_ACC1_VEL: Self = Self::all();

    /// Case name, e.g. `ACC0_ACC1_VEL`.
    pub const fn name(self) -> &'static str {
        match self.bits() {
            0b111 => "ACC0_ACC1_VEL",
            0b110 => "ACC1_VEL",
            0b101 => "ACC0_VEL",
            0b100 => "VEL",
            0b011 => "ACC0_ACC1",
            0b010 => "ACC1",
            0b001 => "ACC0",
            _ => "NONE",
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign of the jerk in the first phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

/// Jerk sign pattern of the seven phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Teeth {
    /// `+J, 0, −J, 0, −J, 0, +J`
    #[default]
    Uddu,
    /// `+J, 0, −J, 0, +J, 0, −J`
    Udud,
}

impl Teeth {
    /// Jerks of the seven phases for a first-phase jerk `j`.
    pub const fn jerks(self, j: f64) -> [f64; 7] {
        match self {
            Self::Uddu => [j, 0.0, -j, 0.0, -j, 0.0, j],
            Self::Udud => [j, 0.0, -j, 0.0, j, 0.0, -j],
        }
    }
}

/// Single-axis trajectory: optional two-phase brake followed by seven phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// Phase durations [s].
    pub t: [f64; 7],
    /// Cumulative phase durations; `t_sum[6]` is the duration without brake.
    pub t_sum: [f64; 7],
    /// Phase jerks.
    pub j: [f64; 7],
    /// Acceleration at the phase boundaries.
    pub a: [f64; 8],
    /// Velocity at the phase boundaries.
    pub v: [f64; 8],
    /// Position at the phase boundaries.
    pub p: [f64; 8],

    pub limits: Limits,
    pub direction: Direction,
    pub teeth: Teeth,

    /// Total brake duration, `None` without brake.
    pub t_brake: Option<f64>,
    pub t_brakes: [f64; 2],
    pub j_brakes: [f64; 2],
    /// Brake phase start states.
    pub a_brakes: [f64; 2],
    pub v_brakes: [f64; 2],
    pub p_brakes: [f64; 2],
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            t: [0.0; 7],
            t_sum: [0.0; 7],
            j: [0.0; 7],
            a: [0.0; 8],
            v: [0.0; 8],
            p: [0.0; 8],
            limits: Limits::NONE,
            direction: Direction::Up,
            teeth: Teeth::Uddu,
            t_brake: None,
            t_brakes: [0.0; 2],
            j_brakes: [0.0; 2],
            a_brakes: [0.0; 2],
            v_brakes: [0.0; 2],
            p_brakes: [0.0; 2],
        }
    }
}

impl Profile {
    /// Unchecked profile starting at `start` with the given phases.
    pub fn from_phases(start: &KinematicState, t: [f64; 7], j: [f64; 7]) -> Self {
        let mut profile = Self {
            t,
            j,
            ..Self::default()
        };
        profile.p[0] = start.p;
        profile.v[0] = start.v;
        profile.a[0] = start.a;
        profile
    }

    /// State after `t` seconds of constant jerk `j` from `(p0, v0, a0)`.
    #[inline]
    pub fn integrate(t: f64, p0: f64, v0: f64, a0: f64, j: f64) -> (f64, f64, f64) {
        (
            p0 + t * (v0 + t * (a0 / 2.0 + t * j / 6.0)),
            v0 + t * (a0 + t * j / 2.0),
            a0 + t * j,
        )
    }

    /// Total duration including the brake [s].
    #[inline]
    pub fn duration(&self) -> f64 {
        self.t_sum[6] + self.t_brake.unwrap_or(0.0)
    }

    /// State where the seven phases begin (after the brake).
    #[inline]
    pub fn start(&self) -> KinematicState {
        KinematicState::new(self.p[0], self.v[0], self.a[0])
    }

    /// State at the end of the last phase.
    #[inline]
    pub fn end(&self) -> KinematicState {
        KinematicState::new(self.p[7], self.v[7], self.a[7])
    }

    /// Record a brake starting at `start`; returns the state after it.
    pub fn set_brake(&mut self, start: &KinematicState, brake: &BrakeTrajectory) -> KinematicState {
        self.t_brakes = brake.t;
        self.j_brakes = brake.j;
        let total = brake.duration();
        self.t_brake = (total > 0.0).then_some(total);

        let (mut p, mut v, mut a) = (start.p, start.v, start.a);
        for i in 0..2 {
            self.p_brakes[i] = p;
            self.v_brakes[i] = v;
            self.a_brakes[i] = a;
            (p, v, a) = Self::integrate(self.t_brakes[i], p, v, a, self.j_brakes[i]);
        }
        KinematicState::new(p, v, a)
    }

    /// Copy the brake of `input` onto this profile.
    pub fn inherit_brake(&mut self, input: &Profile) {
        self.t_brake = input.t_brake;
        self.t_brakes = input.t_brakes;
        self.j_brakes = input.j_brakes;
        self.a_brakes = input.a_brakes;
        self.v_brakes = input.v_brakes;
        self.p_brakes = input.p_brakes;
    }

    /// Clamp, integrate and validate the phases.
    ///
    /// Returns false if a duration is negative beyond [`TIME_EPS`], a limit is
    /// exceeded at a phase boundary or at a velocity extremum inside a phase,
    /// or the last phase misses `goal`.
    pub fn check(&mut self, goal: &KinematicState, limits: &KinematicLimits) -> bool {
        for t in self.t.iter_mut() {
            if !t.is_finite() || *t < -TIME_EPS {
                return false;
            }
            *t = t.max(0.0);
        }

        let mut sum = 0.0;
        for i in 0..7 {
            sum += self.t[i];
            self.t_sum[i] = sum;
            (self.p[i + 1], self.v[i + 1], self.a[i + 1]) =
                Self::integrate(self.t[i], self.p[i], self.v[i], self.a[i], self.j[i]);
        }

        let a_bound = limits.a_max + scaled(LIMIT_EPS, limits.a_max);
        let v_upper = limits.v_max + scaled(LIMIT_EPS, limits.v_max);
        let v_lower = limits.v_min - scaled(LIMIT_EPS, limits.v_min);
        let in_band = |v: f64| v >= v_lower && v <= v_upper;

        for i in 0..7 {
            if self.a[i + 1].abs() > a_bound || !in_band(self.v[i + 1]) {
                return false;
            }
            // Velocity extremum where the acceleration crosses zero.
            if self.j[i] != 0.0 && self.a[i] * self.a[i + 1] < 0.0 {
                let v_extremum = self.v[i] - self.a[i] * self.a[i] / (2.0 * self.j[i]);
                if !in_band(v_extremum) {
                    return false;
                }
            }
        }

        (self.p[7] - goal.p).abs() <= scaled(P_PRECISION, goal.p)
            && (self.v[7] - goal.v).abs() <= scaled(V_PRECISION, goal.v)
            && (self.a[7] - goal.a).abs() <= scaled(A_PRECISION, goal.a)
    }

    /// Sample the profile `time` seconds after the brake started.
    ///
    /// Before zero the start is returned; after the end the final acceleration
    /// is held.
    pub fn state_at(&self, time: f64) -> KinematicState {
        let mut t = time.max(0.0);

        if let Some(t_brake) = self.t_brake {
            if t < t_brake {
                let (i, dt) = if t < self.t_brakes[0] {
                    (0, t)
                } else {
                    (1, t - self.t_brakes[0])
                };
                let (p, v, a) = Self::integrate(
                    dt,
                    self.p_brakes[i],
                    self.v_brakes[i],
                    self.a_brakes[i],
                    self.j_brakes[i],
                );
                return KinematicState::new(p, v, a);
            }
            t -= t_brake;
        }

        if t >= self.t_sum[6] {
            let (p, v, a) = Self::integrate(t - self.t_sum[6], self.p[7], self.v[7], self.a[7], 0.0);
            return KinematicState::new(p, v, a);
        }

        let i = self.t_sum.iter().position(|&s| t < s).unwrap_or(6);
        let dt = t - (self.t_sum[i] - self.t[i]);
        let (p, v, a) = Self::integrate(dt, self.p[i], self.v[i], self.a[i], self.j[i]);
        KinematicState::new(p, v, a)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_limits() -> KinematicLimits {
        KinematicLimits::symmetric(1.0, 1.0, 1.0)
    }

    /// Rest-to-rest over 2 units with unit jerk, peak velocity exactly 1.
    fn triangular() -> Profile {
        Profile::from_phases(
            &KinematicState::at_rest(0.0),
            [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            Teeth::Uddu.jerks(1.0),
        )
    }

    #[test]
    fn integrate_constant_jerk() {
        let (p, v, a) = Profile::integrate(2.0, 1.0, 0.5, -1.0, 3.0);
        assert!((p - (1.0 + 1.0 - 2.0 + 4.0)).abs() < 1e-12);
        assert!((v - (0.5 - 2.0 + 6.0)).abs() < 1e-12);
        assert!((a - 5.0).abs() < 1e-12);
    }

    #[test]
    fn check_accepts_reachable_goal() {
        let mut profile = triangular();
        assert!(profile.check(&KinematicState::at_rest(2.0), &unit_limits()));
        assert!((profile.duration() - 4.0).abs() < 1e-12);
        assert!((profile.v[3] - 1.0).abs() < 1e-12);
        assert_eq!(profile.a[3], 0.0);
    }

    #[test]
    fn check_rejects_missed_goal_and_limits() {
        let mut profile = triangular();
        assert!(!profile.check(&KinematicState::at_rest(2.1), &unit_limits()));

        let mut profile = triangular();
        let slow = KinematicLimits::symmetric(0.9, 1.0, 1.0);
        assert!(!profile.check(&KinematicState::at_rest(2.0), &slow));

        let mut profile = triangular();
        let weak = KinematicLimits::symmetric(1.0, 0.9, 1.0);
        assert!(!profile.check(&KinematicState::at_rest(2.0), &weak));
    }

    #[test]
    fn check_clamps_tiny_negative_durations() {
        let mut profile = triangular();
        profile.t[1] = -1e-14;
        assert!(profile.check(&KinematicState::at_rest(2.0), &unit_limits()));
        assert_eq!(profile.t[1], 0.0);

        let mut profile = triangular();
        profile.t[1] = -1e-6;
        assert!(!profile.check(&KinematicState::at_rest(2.0), &unit_limits()));
    }

    #[test]
    fn check_sees_velocity_peak_inside_phase() {
        // a: 1 → −1 in one phase, velocity peaks at 0.5 in the middle.
        let start = KinematicState::new(0.0, 0.0, 1.0);
        let goal = KinematicState::new(2.0 / 3.0, 0.0, -1.0);
        let t = [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let j = [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

        let mut profile = Profile::from_phases(&start, t, j);
        assert!(!profile.check(&goal, &KinematicLimits::symmetric(0.4, 1.0, 1.0)));

        let mut profile = Profile::from_phases(&start, t, j);
        assert!(profile.check(&goal, &KinematicLimits::symmetric(0.6, 1.0, 1.0)));
    }

    #[test]
    fn state_at_samples_phases_and_holds_end() {
        let mut profile = triangular();
        assert!(profile.check(&KinematicState::at_rest(2.0), &unit_limits()));

        let s = profile.state_at(1.0);
        assert!((s.p - 1.0 / 6.0).abs() < 1e-12);
        assert!((s.v - 0.5).abs() < 1e-12);
        assert!((s.a - 1.0).abs() < 1e-12);

        let mid = profile.state_at(2.0);
        assert!((mid.p - 1.0).abs() < 1e-12);
        assert!((mid.v - 1.0).abs() < 1e-12);

        let after = profile.state_at(10.0);
        assert!((after.p - 2.0).abs() < 1e-12);
        assert!(after.v.abs() < 1e-12);
        assert_eq!(profile.state_at(-1.0), KinematicState::at_rest(0.0));
    }

    #[test]
    fn brake_prefix_is_sampled_first() {
        let brake = BrakeTrajectory {
            t: [1.0, 0.5],
            j: [-1.0, 0.0],
        };
        let mut profile = Profile::default();
        let after = profile.set_brake(&KinematicState::new(0.0, 2.0, 0.0), &brake);
        assert_eq!(profile.t_brake, Some(1.5));
        assert!((after.v - (2.0 - 0.5 - 0.5)).abs() < 1e-12);
        assert!((after.a + 1.0).abs() < 1e-12);

        let s = profile.state_at(1.25);
        assert!((s.a + 1.0).abs() < 1e-12);
        assert!((s.v - 1.25).abs() < 1e-12);
    }

    #[test]
    fn limits_names() {
        assert_eq!(Limits::ACC0_ACC1_VEL.name(), "ACC0_ACC1_VEL");
        assert_eq!(Limits::ACC1_VEL.to_string(), "ACC1_VEL");
        assert_eq!(Limits::NONE.name(), "NONE");
        assert_eq!(Limits::default(), Limits::NONE);
        assert!(Limits::ACC0_VEL.contains(Limits::VEL));
        assert!(!Limits::ACC0_ACC1.contains(Limits::VEL));
    }
}
