//! jolt Common Library
//!
//! Shared kinematic value types, numeric tolerances, the trajectory error type
//! and configuration loading utilities for all jolt workspace crates.
//!
//! # Module Structure
//!
//! - [`kinematics`] - Boundary states and kinematic limits of one axis
//! - [`consts`] - Solver tolerances and capacities
//! - [`error`] - Trajectory planning error type
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use jolt_common::prelude::*;
//!
//! let limits = KinematicLimits::symmetric(2.0, 1.0, 2.0);
//! assert!(limits.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod kinematics;
pub mod prelude;
