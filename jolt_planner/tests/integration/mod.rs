//! Shared fixtures for the integration suites.

mod brake_and_block;
mod config;
mod fixed_duration;
mod min_time;

use jolt_common::kinematics::{KinematicLimits, KinematicState};
use jolt_planner::brake::get_brake_trajectory;
use jolt_planner::profile::Profile;
use jolt_planner::solver::Step2;

/// Reference axis: `v_max = 2`, `a_max = 1`, `j_max = 2`.
pub const LIMITS: KinematicLimits = KinematicLimits::symmetric(2.0, 1.0, 2.0);

/// Boundary pairs with non-zero velocity or acceleration, all inside the limits.
pub const SCENARIOS: [(KinematicState, KinematicState); 5] = [
    (KinematicState::new(0.0, 1.0, 0.5), KinematicState::new(5.0, 0.0, 0.0)),
    (KinematicState::at_rest(0.0), KinematicState::new(3.0, 1.0, 0.0)),
    (KinematicState::new(2.0, -1.0, 0.0), KinematicState::new(-4.0, 0.5, -0.5)),
    (KinematicState::new(0.0, 1.5, 0.0), KinematicState::at_rest(0.1)),
    (KinematicState::new(0.0, 0.0, 0.8), KinematicState::at_rest(0.0)),
];

/// Sample `profile` after its brake and assert the limits hold and `goal` is reached.
pub fn assert_follows(profile: &Profile, goal: &KinematicState, limits: &KinematicLimits) {
    const STEPS: usize = 500;
    const TOL: f64 = 1e-7;

    let total = profile.duration();
    let begin = profile.t_brake.unwrap_or(0.0);
    for i in 0..=STEPS {
        let t = begin + (total - begin) * i as f64 / STEPS as f64;
        let state = profile.state_at(t);
        assert!(
            state.v <= limits.v_max + TOL && state.v >= limits.v_min - TOL,
            "velocity {} out of band at t={t}",
            state.v
        );
        assert!(
            state.a.abs() <= limits.a_max + TOL,
            "acceleration {} beyond limit at t={t}",
            state.a
        );
    }

    let end = profile.state_at(total);
    assert!((end.p - goal.p).abs() < TOL, "position {} != {}", end.p, goal.p);
    assert!((end.v - goal.v).abs() < TOL, "velocity {} != {}", end.v, goal.v);
    assert!((end.a - goal.a).abs() < TOL, "acceleration {} != {}", end.a, goal.a);
}

/// Fixed-duration solve for a total duration `tf` that includes the brake of `start`.
pub fn solve_for_duration(
    start: &KinematicState,
    goal: &KinematicState,
    limits: &KinematicLimits,
    tf: f64,
) -> Option<Profile> {
    let brake = get_brake_trajectory(start.v, start.a, limits);
    let mut input = Profile::default();
    let after_brake = input.set_brake(start, &brake);
    Step2::new(tf - brake.duration(), &after_brake, goal, limits).get_profile(&input)
}
