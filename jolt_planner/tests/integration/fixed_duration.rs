//! Fixed-duration planning.

use super::{LIMITS, SCENARIOS, assert_follows};
use jolt_common::error::TrajectoryError;
use jolt_common::kinematics::KinematicState;
use jolt_planner::plan::{plan_min_time, plan_with_duration};
use jolt_planner::profile::Limits;

#[test]
fn stretched_rest_to_rest() {
    let start = KinematicState::at_rest(0.0);
    let goal = KinematicState::at_rest(10.0);

    let profile = plan_with_duration(&start, &goal, &LIMITS, 9.0).unwrap();
    assert!((profile.duration() - 9.0).abs() < 1e-8);
    assert_eq!(profile.limits, Limits::ACC0_ACC1_VEL);
    let v_peak = (8.5 - 32.25_f64.sqrt()) / 2.0;
    assert!((profile.v[3] - v_peak).abs() < 1e-8);
    assert_follows(&profile, &goal, &LIMITS);

    let slow = plan_with_duration(&start, &goal, &LIMITS, 30.0).unwrap();
    assert!((slow.duration() - 30.0).abs() < 1e-8);
    assert!(slow.limits.contains(Limits::VEL));
    assert_follows(&slow, &goal, &LIMITS);
}

#[test]
fn below_minimum_is_rejected() {
    let err = plan_with_duration(
        &KinematicState::at_rest(0.0),
        &KinematicState::at_rest(10.0),
        &LIMITS,
        7.0,
    )
    .unwrap_err();
    assert!(matches!(err, TrajectoryError::DurationBlocked { .. }));
    assert!(err.to_string().contains("blocked"));
}

#[test]
fn short_moves_can_be_stretched() {
    let start = KinematicState::at_rest(0.0);
    for (d, tf) in [(0.25, 2.0), (0.25, 5.0), (2.0, 4.0), (2.0, 8.0)] {
        let goal = KinematicState::at_rest(d);
        let profile = plan_with_duration(&start, &goal, &LIMITS, tf)
            .unwrap_or_else(|e| panic!("d={d}, tf={tf}: {e}"));
        assert!((profile.duration() - tf).abs() < 1e-8, "d={d}, tf={tf}");
        assert_follows(&profile, &goal, &LIMITS);
    }
}

#[test]
fn scenarios_match_requested_durations() {
    for (start, goal) in SCENARIOS {
        let block = plan_min_time(&start, &goal, &LIMITS).unwrap();
        for extra in [0.0, 0.5, 1.0, 3.0] {
            let tf = block.t_min + extra;
            if block.is_blocked(tf) {
                continue;
            }
            let profile = plan_with_duration(&start, &goal, &LIMITS, tf)
                .unwrap_or_else(|e| panic!("{start:?} -> {goal:?}, tf={tf}: {e}"));
            assert!((profile.duration() - tf).abs() < 1e-7, "tf={tf}: {}", profile.duration());
            assert_follows(&profile, &goal, &LIMITS);
        }
    }
}

#[test]
fn minimum_duration_returns_minimum_profile() {
    let (start, goal) = SCENARIOS[0];
    let block = plan_min_time(&start, &goal, &LIMITS).unwrap();
    let profile = plan_with_duration(&start, &goal, &LIMITS, block.t_min).unwrap();
    assert_eq!(profile, block.p_min);
}
