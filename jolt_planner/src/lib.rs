//! # jolt Planner Library
//!
//! Time-optimal, jerk-limited trajectories for a single axis. Given a start
//! and goal state `(p, v, a)` and limits on velocity, acceleration and jerk,
//! the planner finds the minimum duration, the durations for which no profile
//! exists, and a profile for any other requested duration.
//!
//! ## Pipeline
//!
//! 1. **Brake**: bring an out-of-limits start state back inside the limits
//! 2. **Step1**: minimum-time profiles of all eight limit cases, both headings
//! 3. **Block**: minimum duration plus up to two blocked intervals
//! 4. **Step2**: one profile of a prescribed duration
//!
//! ## No Allocation in the Solvers
//!
//! Profiles, polynomials and candidate buffers are fixed-size arrays and
//! `heapless` vectors; every solve performs a bounded amount of work.
//!
//! ```rust
//! use jolt_common::kinematics::{KinematicLimits, KinematicState};
//! use jolt_planner::plan::{plan_min_time, plan_with_duration};
//!
//! let limits = KinematicLimits::symmetric(2.0, 1.0, 2.0);
//! let start = KinematicState::at_rest(0.0);
//! let goal = KinematicState::at_rest(10.0);
//!
//! let block = plan_min_time(&start, &goal, &limits).unwrap();
//! assert!((block.t_min - 7.5).abs() < 1e-9);
//!
//! let slower = plan_with_duration(&start, &goal, &limits, 9.0).unwrap();
//! assert!((slower.duration() - 9.0).abs() < 1e-8);
//! ```

#![deny(clippy::disallowed_types)]

pub mod block;
pub mod brake;
pub mod config;
pub mod math;
pub mod plan;
pub mod profile;
pub mod solver;
