//! Minimum-time planning.

use super::{LIMITS, SCENARIOS, assert_follows};
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use jolt_planner::plan::plan_min_time;
use jolt_planner::profile::Limits;

fn t_min(start: KinematicState, goal: KinematicState, limits: &KinematicLimits) -> f64 {
    plan_min_time(&start, &goal, limits).unwrap().t_min
}

#[test]
fn rest_to_rest_closed_forms() {
    let cruise = t_min(KinematicState::at_rest(0.0), KinematicState::at_rest(10.0), &LIMITS);
    assert!((cruise - 7.5).abs() < 1e-9, "{cruise}");

    let v_peak = (-0.5 + 8.25_f64.sqrt()) / 2.0;
    let acc = t_min(KinematicState::at_rest(0.0), KinematicState::at_rest(2.0), &LIMITS);
    assert!((acc - 2.0 * (v_peak + 0.5)).abs() < 1e-9, "{acc}");

    let triangle = t_min(KinematicState::at_rest(0.0), KinematicState::at_rest(0.25), &LIMITS);
    assert!((triangle - 4.0 * 0.0625_f64.cbrt()).abs() < 1e-9, "{triangle}");
}

#[test]
fn mirrored_moves_take_equally_long() {
    for d in [0.25, 2.0, 10.0] {
        let up = t_min(KinematicState::at_rest(0.0), KinematicState::at_rest(d), &LIMITS);
        let down = t_min(KinematicState::at_rest(0.0), KinematicState::at_rest(-d), &LIMITS);
        assert!((up - down).abs() < 1e-9, "d={d}: {up} vs {down}");
    }
}

#[test]
fn cruise_profile_reaches_velocity_limit() {
    let block = plan_min_time(&KinematicState::at_rest(0.0), &KinematicState::at_rest(10.0), &LIMITS).unwrap();
    assert_eq!(block.p_min.limits, Limits::ACC0_ACC1_VEL);
    assert!((block.p_min.v[3] - LIMITS.v_max).abs() < 1e-9);
    assert_follows(&block.p_min, &KinematicState::at_rest(10.0), &LIMITS);
}

#[test]
fn scenarios_reach_goal_within_limits() {
    for (start, goal) in SCENARIOS {
        let block = plan_min_time(&start, &goal, &LIMITS).unwrap_or_else(|e| panic!("{start:?} -> {goal:?}: {e}"));
        assert!(block.t_min > 0.0);
        assert!(!block.is_blocked(block.t_min));
        assert_follows(&block.p_min, &goal, &LIMITS);
    }
}

#[test]
fn higher_limits_never_slow_down() {
    let start = KinematicState::new(0.0, 0.5, 0.0);
    let goal = KinematicState::at_rest(3.0);

    let mut previous = f64::INFINITY;
    for j_max in [1.0, 2.0, 4.0, 8.0] {
        let t = t_min(start, goal, &KinematicLimits::symmetric(2.0, 1.0, j_max));
        assert!(t <= previous + 1e-9, "j_max={j_max}: {t} > {previous}");
        previous = t;
    }

    let mut previous = f64::INFINITY;
    for a_max in [0.5, 1.0, 2.0, 4.0] {
        let t = t_min(start, goal, &KinematicLimits::symmetric(2.0, a_max, 2.0));
        assert!(t <= previous + 1e-9, "a_max={a_max}: {t} > {previous}");
        previous = t;
    }
}

#[test]
fn planning_is_repeatable() {
    let (start, goal) = SCENARIOS[2];
    let first = plan_min_time(&start, &goal, &LIMITS).unwrap();
    let second = plan_min_time(&start, &goal, &LIMITS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn standstill_needs_no_time() {
    let state = KinematicState::new(1.5, 0.0, 0.0);
    let block = plan_min_time(&state, &state, &LIMITS).unwrap();
    assert_eq!(block.t_min, 0.0);
    assert!(block.a.is_none() && block.b.is_none());
}

#[test]
fn asymmetric_velocity_band() {
    let limits = KinematicLimits {
        v_max: 1.0,
        v_min: -0.5,
        a_max: 1.0,
        j_max: 2.0,
    };
    let goal = KinematicState::at_rest(-5.0);
    let block = plan_min_time(&KinematicState::at_rest(0.0), &goal, &limits).unwrap();
    // Cruises at v_min, not at -v_max.
    assert!((block.p_min.v[3] - limits.v_min).abs() < 1e-9);
    assert_follows(&block.p_min, &goal, &limits);
}
