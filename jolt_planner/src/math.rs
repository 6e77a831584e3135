//! Polynomial algebra used by the case functions of the solvers.
//!
//! - [`poly`]: fixed-capacity polynomials and surds
//! - [`roots`]: real roots inside an interval

pub mod poly;
pub mod roots;

pub use poly::{POLY_CAPACITY, Poly, Surd, SurdField};
pub use roots::{Roots, real_roots, solve_quadratic};
