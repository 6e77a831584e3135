//! Profiles parametrised by one free variable.
//!
//! A case function expresses the seven phase durations as [`Surd`]s in a free
//! variable `x`. Integrating them symbolically gives the final position as a
//! surd; squaring out the root yields a polynomial whose real roots in the
//! admissible range are the candidate values of `x`. Each candidate is
//! polished on the unsquared residual of each root branch and handed to the
//! caller as numeric phase durations.

use jolt_common::kinematics::KinematicState;

use crate::math::{Poly, Surd, SurdField, real_roots};

/// Newton steps on the unsquared residual.
const POLISH_ITERATIONS: usize = 4;

/// A slightly negative radicand at a root counts as zero.
const RADICAND_REL: f64 = 1e-9;

/// One case of a solver: phase durations as functions of the free variable.
pub(crate) struct Family {
    pub jerks: [f64; 7],
    pub times: [Surd; 7],
    pub field: SurdField,
    /// Admissible range of the free variable.
    pub domain: (f64, f64),
}

impl Family {
    /// Visit every duration vector whose final position is `pf`.
    ///
    /// Stops at the first visit returning true and reports whether that happened.
    pub fn solve<F>(&self, start: &KinematicState, pf: f64, mut visit: F) -> bool
    where
        F: FnMut([f64; 7]) -> bool,
    {
        let residual = self.final_position(start) - pf;
        let radical = !residual.is_rational() || self.times.iter().any(|t| !t.is_rational());
        let branches: &[f64] = if radical { &[1.0, -1.0] } else { &[1.0] };

        let (lo, hi) = self.domain;
        for &root in real_roots(&residual.eliminate(), lo, hi).iter() {
            for &sign in branches {
                let x = if radical {
                    polish(&residual, root, sign, lo, hi)
                } else {
                    root
                };
                let Some(sqrt) = self.root_at(x, sign) else {
                    continue;
                };
                if visit(self.times.map(|t| t.eval(x, sqrt))) {
                    return true;
                }
            }
        }
        false
    }

    /// Position after all phases.
    fn final_position(&self, start: &KinematicState) -> Surd {
        let f = &self.field;
        let (mut p, mut v, mut a) = (f.constant(start.p), f.constant(start.v), f.constant(start.a));
        for (&t, &j) in self.times.iter().zip(&self.jerks) {
            if t.is_zero() {
                continue;
            }
            let t2 = t * t;
            let mut dp = v * t + a * t2 * 0.5;
            let mut dv = a * t;
            if j != 0.0 {
                dp = dp + t2 * t * (j / 6.0);
                dv = dv + t2 * (j / 2.0);
                a = a + t * j;
            }
            p = p + dp;
            v = v + dv;
        }
        p
    }

    /// Signed square root of the radicand at `x`.
    fn root_at(&self, x: f64, sign: f64) -> Option<f64> {
        let radicand = self.field.radicand();
        if radicand.is_zero() {
            return Some(0.0);
        }
        let r = radicand.eval(x);
        if r < -RADICAND_REL * radicand.eval_magnitude(x).max(1.0) {
            return None;
        }
        Some(sign * r.max(0.0).sqrt())
    }
}

/// Newton iteration on `rational + irrational·sign·√radicand`, kept only while
/// it shrinks the residual inside `[lo, hi]`.
fn polish(residual: &Surd, x0: f64, sign: f64, lo: f64, hi: f64) -> f64 {
    let value = |x: f64| -> Option<f64> {
        let r = residual.radicand.eval(x);
        (r >= 0.0).then(|| residual.eval(x, sign * r.sqrt()))
    };
    let d_rational = residual.rational.derivative();
    let d_irrational = residual.irrational.derivative();
    let d_radicand = residual.radicand.derivative();

    let mut x = x0;
    let Some(mut f) = value(x) else {
        return x0;
    };
    for _ in 0..POLISH_ITERATIONS {
        let r = residual.radicand.eval(x);
        if f == 0.0 || r <= 0.0 {
            break;
        }
        let root = sign * r.sqrt();
        let df = d_rational.eval(x)
            + d_irrational.eval(x) * root
            + residual.irrational.eval(x) * d_radicand.eval(x) / (2.0 * root);
        if df == 0.0 || !df.is_finite() {
            break;
        }
        let next = x - f / df;
        if !(lo..=hi).contains(&next) {
            break;
        }
        match value(next) {
            Some(f_next) if f_next.abs() < f.abs() => {
                x = next;
                f = f_next;
            }
            _ => break,
        }
    }
    x
}

/// Symmetric widening of an admissible range so that roots on its edge survive rounding.
pub(crate) fn widen(lo: f64, hi: f64) -> (f64, f64) {
    let margin = 1e-9 * lo.abs().max(hi.abs()).max(1.0);
    (lo - margin, hi + margin)
}

/// Quadratic `c0 + c2·x²`.
#[inline]
pub(crate) fn even_quadratic(c0: f64, c2: f64) -> Poly {
    Poly::from_coeffs(&[c0, 0.0, c2])
}
