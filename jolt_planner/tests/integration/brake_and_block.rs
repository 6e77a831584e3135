//! Brake pre-trajectories and blocked duration intervals.

use super::{LIMITS, SCENARIOS, assert_follows, solve_for_duration};
use jolt_common::error::TrajectoryError;
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use jolt_planner::brake::get_brake_trajectory;
use jolt_planner::plan::{plan_min_time, plan_with_duration};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Durations closer than this to `t_min` or an interval edge are not sampled.
const EDGE_MARGIN: f64 = 1e-5;

/// Sample durations past `t_min`: blocked ones have no profile, all others do.
fn assert_block_matches_step2(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) {
    const STEPS: usize = 40;

    let block = plan_min_time(start, goal, limits).unwrap();
    let last_edge = block.intervals().fold(block.t_min, |m, (_, right)| m.max(right));
    let horizon = 3.0 * last_edge + 1.0;
    let near_edge = |tf: f64| {
        (tf - block.t_min).abs() < EDGE_MARGIN
            || block
                .intervals()
                .any(|(left, right)| (tf - left).abs() < EDGE_MARGIN || (tf - right).abs() < EDGE_MARGIN)
    };

    for i in 1..=STEPS {
        let tf = block.t_min + (horizon - block.t_min) * i as f64 / STEPS as f64;
        if near_edge(tf) {
            continue;
        }
        let solved = solve_for_duration(start, goal, limits, tf);
        if block.is_blocked(tf) {
            assert!(solved.is_none(), "tf={tf} is blocked but solvable: {start:?} -> {goal:?}");
        } else {
            let profile =
                solved.unwrap_or_else(|| panic!("tf={tf} is free but unsolved: {start:?} -> {goal:?}"));
            assert!((profile.duration() - tf).abs() < 1e-7 * tf.max(1.0));
            assert_follows(&profile, goal, limits);
        }
    }
}

fn random_state(rng: &mut StdRng) -> KinematicState {
    KinematicState::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-0.9..0.9),
    )
}

#[test]
fn overspeed_start_brakes_first() {
    let start = KinematicState::new(0.0, 3.0, 0.0);
    let goal = KinematicState::at_rest(20.0);

    let brake = get_brake_trajectory(start.v, start.a, &LIMITS);
    assert!(!brake.is_empty());

    let block = plan_min_time(&start, &goal, &LIMITS).unwrap();
    let t_brake = block.p_min.t_brake.unwrap();
    assert!((t_brake - brake.duration()).abs() < 1e-12);
    assert!(block.t_min > t_brake);

    let after = block.p_min.state_at(t_brake);
    assert!(after.v <= LIMITS.v_max + 1e-9);
    assert!(after.a.abs() <= LIMITS.a_max + 1e-9);
    assert_follows(&block.p_min, &goal, &LIMITS);
}

#[test]
fn excess_acceleration_start_brakes_first() {
    let start = KinematicState::new(0.0, 0.0, 1.5);
    let goal = KinematicState::at_rest(5.0);
    let block = plan_min_time(&start, &goal, &LIMITS).unwrap();
    let t_brake = block.p_min.t_brake.unwrap();
    assert!((t_brake - 0.25).abs() < 1e-12);
    assert!((block.p_min.state_at(t_brake).a - LIMITS.a_max).abs() < 1e-12);
    assert_follows(&block.p_min, &goal, &LIMITS);
}

#[test]
fn braked_move_with_duration_counts_the_brake() {
    let start = KinematicState::new(0.0, 3.0, 0.0);
    let goal = KinematicState::at_rest(20.0);
    let block = plan_min_time(&start, &goal, &LIMITS).unwrap();

    let tf = block.t_min + 2.0;
    if !block.is_blocked(tf) {
        let profile = plan_with_duration(&start, &goal, &LIMITS, tf).unwrap();
        assert!((profile.duration() - tf).abs() < 1e-7);
        assert_eq!(profile.t_brake, block.p_min.t_brake);
        assert_follows(&profile, &goal, &LIMITS);
    }
}

#[test]
fn blocked_intervals_are_consistent() {
    let mut cases = SCENARIOS.to_vec();
    cases.push((KinematicState::new(0.0, 1.8, 0.0), KinematicState::new(0.5, 1.8, 0.0)));
    cases.push((KinematicState::new(0.0, -1.0, -0.9), KinematicState::new(1.0, 1.0, 0.0)));

    for (start, goal) in cases {
        let block = plan_min_time(&start, &goal, &LIMITS).unwrap();
        assert!(!block.is_blocked(block.t_min));

        for interval in [block.a, block.b].into_iter().flatten() {
            assert!(interval.left >= block.t_min);
            assert!(interval.left < interval.right);
            assert!(!block.is_blocked(interval.left));
            assert!(!block.is_blocked(interval.right));
            assert_follows(&interval.profile, &goal, &LIMITS);

            let inside = 0.5 * (interval.left + interval.right);
            assert!(block.is_blocked(inside));
            assert!(solve_for_duration(&start, &goal, &LIMITS, inside).is_none());
            assert!(matches!(
                plan_with_duration(&start, &goal, &LIMITS, inside),
                Err(TrajectoryError::DurationBlocked { .. })
            ));
        }
        assert_block_matches_step2(&start, &goal, &LIMITS);
    }
}

#[test]
fn moving_coincident_state_blocks_short_durations() {
    for v in [0.5, -0.8, 1.5] {
        let state = KinematicState::new(1.0, v, 0.0);
        let block = plan_min_time(&state, &state, &LIMITS).unwrap();
        assert_eq!(block.t_min, 0.0);
        let interval = block.a.unwrap();
        assert_eq!(interval.left, 0.0);

        for tf in [0.1, 0.5 * interval.right] {
            assert!(matches!(
                plan_with_duration(&state, &state, &LIMITS, tf),
                Err(TrajectoryError::DurationBlocked { .. })
            ));
        }
        assert_block_matches_step2(&state, &state, &LIMITS);
    }
}

#[test]
fn near_duplicate_candidates_keep_the_right_edge() {
    let start = KinematicState::new(-4.2922, -0.35189, -1.40403);
    let goal = KinematicState::new(-4.61454, 0.17393, 1.72655);
    let limits = KinematicLimits {
        v_max: 1.9958,
        v_min: -2.6819,
        a_max: 2.2068,
        j_max: 4.7463,
    };

    let block = plan_min_time(&start, &goal, &limits).unwrap();
    assert!(block.intervals().any(|(_, right)| (right - 1.903945).abs() < 1e-2));
    assert!(matches!(
        plan_with_duration(&start, &goal, &limits, 1.15),
        Err(TrajectoryError::DurationBlocked { .. })
    ));
    assert_block_matches_step2(&start, &goal, &limits);
}

#[test]
fn random_boundary_states_agree_with_step2() {
    let mut rng = StdRng::seed_from_u64(0x6a6f_6c74);
    for _ in 0..40 {
        let start = random_state(&mut rng);
        let goal = random_state(&mut rng);
        assert_block_matches_step2(&start, &goal, &LIMITS);
    }
}
