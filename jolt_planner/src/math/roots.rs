//! Real roots of low-degree polynomials inside an interval.
//!
//! Quadratics use the closed form. Higher degrees recurse on the derivative:
//! its real roots split the interval into monotone brackets, each bracket with
//! a sign change holds exactly one root which is refined by safeguarded Newton
//! iteration. Critical points where the polynomial is zero up to rounding are
//! reported as (tangential) roots too.

use super::poly::{POLY_CAPACITY, Poly};

/// Sorted, deduplicated real roots.
pub type Roots = heapless::Vec<f64, POLY_CAPACITY>;

/// Iteration cap of one bracket refinement.
const MAX_REFINE_ITERATIONS: usize = 128;

/// Leading terms below this fraction of the largest term on the window are dropped.
const TRIM_REL: f64 = 1e-14;

/// A critical point whose value is within this fraction of the evaluation
/// magnitude counts as a tangential root.
const TANGENT_REL: f64 = 1e-10;

/// Real roots of `a·x² + b·x + c`, ascending. Degenerates to the linear case.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::new();
    if a == 0.0 {
        if b != 0.0 {
            push_root(&mut roots, -c / b);
        }
        return roots;
    }

    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        // Tangent within rounding.
        if disc > -1e-12 * (b * b).max((4.0 * a * c).abs()) {
            disc = 0.0;
        } else {
            return roots;
        }
    }

    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        push_root(&mut roots, 0.0);
    } else {
        push_root(&mut roots, q / a);
        push_root(&mut roots, c / q);
    }
    finish(&mut roots);
    roots
}

/// Real roots of `p` in `[lo, hi]`, ascending. Infinite bounds are replaced by
/// the Cauchy bound.
pub fn real_roots(p: &Poly, lo: f64, hi: f64) -> Roots {
    let mut roots = Roots::new();
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return roots;
    }
    let radius = [lo, hi]
        .into_iter()
        .filter(|b| b.is_finite())
        .fold(1.0_f64, |r, b| r.max(b.abs()));
    let p = p.trimmed(TRIM_REL, radius);
    let Some(deg) = p.degree() else {
        return roots;
    };

    match deg {
        0 => {}
        1 => {
            let x = -p.coeff(0) / p.coeff(1);
            if (lo..=hi).contains(&x) {
                push_root(&mut roots, x);
            }
        }
        2 => {
            for x in solve_quadratic(p.coeff(2), p.coeff(1), p.coeff(0)) {
                if (lo..=hi).contains(&x) {
                    push_root(&mut roots, x);
                }
            }
        }
        _ => {
            let bound = cauchy_bound(&p, deg);
            let lo = lo.max(-bound);
            let hi = hi.min(bound);
            if lo > hi {
                return roots;
            }

            let dp = p.derivative();
            let critical = real_roots(&dp, lo, hi);

            let mut left = lo;
            let mut f_left = p.eval(lo);
            if f_left == 0.0 {
                push_root(&mut roots, lo);
            }
            for &right in critical.iter().chain(core::iter::once(&hi)) {
                let f_right = p.eval(right);
                if f_right == 0.0 {
                    push_root(&mut roots, right);
                } else if f_left != 0.0 && (f_left < 0.0) != (f_right < 0.0) {
                    push_root(&mut roots, refine(&p, &dp, left, right, f_left));
                }
                left = right;
                f_left = f_right;
            }

            for &c in critical.iter() {
                if p.eval(c).abs() <= TANGENT_REL * p.eval_magnitude(c) {
                    push_root(&mut roots, c);
                }
            }
        }
    }

    finish(&mut roots);
    roots
}

/// All roots lie within `1 + max |c_i / c_n|`.
fn cauchy_bound(p: &Poly, deg: usize) -> f64 {
    let lead = p.coeff(deg).abs();
    let max_ratio = (0..deg).fold(0.0_f64, |m, i| m.max(p.coeff(i).abs() / lead));
    1.0 + max_ratio
}

/// Single root of `p` in the monotone bracket `[lo, hi]` with `p(lo) = f_lo`.
fn refine(p: &Poly, dp: &Poly, mut lo: f64, mut hi: f64, f_lo: f64) -> f64 {
    let lo_negative = f_lo < 0.0;
    let mut x = 0.5 * (lo + hi);
    for _ in 0..MAX_REFINE_ITERATIONS {
        let fx = p.eval(x);
        if fx == 0.0 {
            return x;
        }
        if (fx < 0.0) == lo_negative {
            lo = x;
        } else {
            hi = x;
        }

        // Newton step, falling back to bisection when it leaves the bracket.
        let newton = x - fx / dp.eval(x);
        let next = if newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
        if (next - x).abs() <= f64::EPSILON * x.abs().max(1.0) {
            return next;
        }
        x = next;
    }
    x
}

fn push_root(roots: &mut Roots, x: f64) {
    if x.is_finite() {
        // Capacity exceeds the number of real roots of any storable polynomial.
        let _ = roots.push(x);
    }
}

fn finish(roots: &mut Roots) {
    roots.sort_unstable_by(|a, b| a.total_cmp(b));
    let mut out = Roots::new();
    for &x in roots.iter() {
        match out.last() {
            Some(&prev) if (x - prev).abs() <= 1e-14 * x.abs().max(1.0) => {}
            _ => {
                let _ = out.push(x);
            }
        }
    }
    *roots = out;
}
