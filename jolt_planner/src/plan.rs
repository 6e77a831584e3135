//! Planning entry points.
//!
//! Validates the input, applies the brake and runs the solvers. This is the
//! only layer that turns a missing profile into a [`TrajectoryError`].

use core::fmt;

use jolt_common::consts::{T_PRECISION, scaled};
use jolt_common::error::TrajectoryError;
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use serde::Serialize;
use tracing::debug;

use crate::block::Block;
use crate::brake::get_brake_trajectory;
use crate::profile::{Direction, Profile, Teeth};
use crate::solver::{Step1, Step2};

/// Empty profile carrying the brake of `start`, and the state after that brake.
fn braked_input(start: &KinematicState, limits: &KinematicLimits) -> (Profile, KinematicState) {
    let brake = get_brake_trajectory(start.v, start.a, limits);
    let mut input = Profile::default();
    let after_brake = input.set_brake(start, &brake);
    if !brake.is_empty() {
        debug!(t = ?brake.t, j = ?brake.j, after = ?after_brake, "brake applied");
    }
    (input, after_brake)
}

fn validate(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Result<(), TrajectoryError> {
    limits.validate()?;
    start.validate("start")?;
    goal.validate("goal")
}

/// Minimum duration and blocked intervals from `start` to `goal`.
///
/// # Errors
///
/// - `TrajectoryError::InvalidInput` for malformed limits or states
/// - `TrajectoryError::Infeasible` if no case yields a profile
pub fn plan_min_time(
    start: &KinematicState,
    goal: &KinematicState,
    limits: &KinematicLimits,
) -> Result<Block, TrajectoryError> {
    validate(start, goal, limits)?;
    let (input, after_brake) = braked_input(start, limits);
    Step1::new(&after_brake, goal, limits)
        .get_profile(&input)
        .ok_or(TrajectoryError::Infeasible)
}

/// Profile from `start` to `goal` taking exactly `duration` seconds, brake included.
///
/// # Errors
///
/// - `TrajectoryError::InvalidInput` for malformed input or a negative duration
/// - `TrajectoryError::Infeasible` if not even a minimum-time profile exists
/// - `TrajectoryError::DurationBlocked` below the minimum or inside a blocked interval
/// - `TrajectoryError::NoProfileForDuration` if the fixed-duration solver fails
pub fn plan_with_duration(
    start: &KinematicState,
    goal: &KinematicState,
    limits: &KinematicLimits,
    duration: f64,
) -> Result<Profile, TrajectoryError> {
    validate(start, goal, limits)?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(TrajectoryError::InvalidInput(format!(
            "duration must be finite and non-negative, got {duration}"
        )));
    }

    let (input, after_brake) = braked_input(start, limits);
    let block = Step1::new(&after_brake, goal, limits)
        .get_profile(&input)
        .ok_or(TrajectoryError::Infeasible)?;

    if let Some(profile) = block.profile_at(duration, scaled(T_PRECISION, duration)) {
        return Ok(*profile);
    }
    if block.is_blocked(duration) {
        return Err(TrajectoryError::DurationBlocked {
            duration,
            t_min: block.t_min,
        });
    }

    let tf = duration - input.t_brake.unwrap_or(0.0);
    Step2::new(tf, &after_brake, goal, limits)
        .get_profile(&input)
        .ok_or(TrajectoryError::NoProfileForDuration(duration))
}

/// Summary of one planned move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveReport {
    pub name: String,
    /// Minimum duration [s].
    pub t_min: f64,
    /// Blocked duration intervals [s].
    pub blocked: Vec<(f64, f64)>,
    /// Duration of the reported profile [s].
    pub duration: f64,
    /// Limit case of the reported profile.
    pub case: &'static str,
    pub direction: Direction,
    pub teeth: Teeth,
    /// Brake duration [s], if any.
    pub brake: Option<f64>,
    /// Phase durations [s].
    pub phases: [f64; 7],
    pub jerks: [f64; 7],
    /// State sampled at the end of the profile.
    pub final_state: KinematicState,
}

impl MoveReport {
    pub fn new(name: &str, block: &Block, profile: &Profile) -> Self {
        let duration = profile.duration();
        Self {
            name: name.to_string(),
            t_min: block.t_min,
            blocked: block.intervals().collect(),
            duration,
            case: profile.limits.name(),
            direction: profile.direction,
            teeth: profile.teeth,
            brake: profile.t_brake,
            phases: profile.t,
            jerks: profile.j,
            final_state: profile.state_at(duration),
        }
    }
}

impl fmt::Display for MoveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "move {}", self.name)?;
        writeln!(f, "  t_min      {:.6} s", self.t_min)?;
        for (left, right) in &self.blocked {
            writeln!(f, "  blocked    ({left:.6}, {right:.6}) s")?;
        }
        writeln!(f, "  duration   {:.6} s", self.duration)?;
        writeln!(f, "  case       {} {:?} {:?}", self.case, self.direction, self.teeth)?;
        if let Some(brake) = self.brake {
            writeln!(f, "  brake      {brake:.6} s")?;
        }
        write!(f, "  phases    ")?;
        for (t, j) in self.phases.iter().zip(&self.jerks) {
            write!(f, " {t:.6}@{j:+}")?;
        }
        writeln!(f)?;
        write!(
            f,
            "  final      p={:.6} v={:.6} a={:.6}",
            self.final_state.p, self.final_state.v, self.final_state.a
        )
    }
}
