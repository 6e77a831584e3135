//! Fixed-capacity polynomials and surds over `f64`.
//!
//! A case of the solvers is a family of profiles parametrised by one free
//! variable `x`. Phase durations are polynomials in `x`, possibly plus a
//! polynomial multiple of `√r(x)`. Integrating the phases symbolically and
//! squaring out the root leaves a single real polynomial whose roots are the
//! candidate values of `x`.

use core::ops::{Add, Mul, Neg, Sub};
use static_assertions::const_assert;

/// Number of coefficients a [`Poly`] can hold.
pub const POLY_CAPACITY: usize = 13;

const_assert!(POLY_CAPACITY >= 9);

/// Polynomial with ascending coefficients: `c[0] + c[1]·x + c[2]·x² + …`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poly {
    c: [f64; POLY_CAPACITY],
}

impl Default for Poly {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Poly {
    /// The zero polynomial.
    pub const ZERO: Self = Self {
        c: [0.0; POLY_CAPACITY],
    };

    /// Constant polynomial.
    pub const fn constant(c0: f64) -> Self {
        let mut c = [0.0; POLY_CAPACITY];
        c[0] = c0;
        Self { c }
    }

    /// `c0 + c1·x`.
    pub const fn linear(c0: f64, c1: f64) -> Self {
        let mut c = [0.0; POLY_CAPACITY];
        c[0] = c0;
        c[1] = c1;
        Self { c }
    }

    /// The identity `x`.
    pub const fn x() -> Self {
        Self::linear(0.0, 1.0)
    }

    /// Polynomial from ascending coefficients; extra coefficients are dropped.
    pub fn from_coeffs(coeffs: &[f64]) -> Self {
        debug_assert!(coeffs.len() <= POLY_CAPACITY);
        let mut c = [0.0; POLY_CAPACITY];
        for (dst, src) in c.iter_mut().zip(coeffs) {
            *dst = *src;
        }
        Self { c }
    }

    /// Coefficient of `x^power` (zero beyond the capacity).
    #[inline]
    pub fn coeff(&self, power: usize) -> f64 {
        self.c.get(power).copied().unwrap_or(0.0)
    }

    /// Degree, `None` for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> Option<usize> {
        self.c.iter().rposition(|&c| c != 0.0)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }

    /// Horner evaluation.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let Some(deg) = self.degree() else {
            return 0.0;
        };
        self.c[..=deg].iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// `Σ |c_i|·|x|^i`: the scale against which rounding in `eval(x)` is judged.
    #[inline]
    pub fn eval_magnitude(&self, x: f64) -> f64 {
        let Some(deg) = self.degree() else {
            return 0.0;
        };
        let ax = x.abs();
        self.c[..=deg].iter().rev().fold(0.0, |acc, &c| acc * ax + c.abs())
    }

    pub fn derivative(&self) -> Self {
        let mut c = [0.0; POLY_CAPACITY];
        for (i, dst) in c.iter_mut().enumerate().take(POLY_CAPACITY - 1) {
            *dst = self.c[i + 1] * (i + 1) as f64;
        }
        Self { c }
    }

    /// Drop leading terms whose size on `|x| ≤ radius` is below `rel` times
    /// the largest term.
    pub fn trimmed(&self, rel: f64, radius: f64) -> Self {
        let term = |i: usize, c: f64| c.abs() * radius.powi(i as i32);
        let threshold = rel
            * self
                .c
                .iter()
                .enumerate()
                .fold(0.0_f64, |m, (i, &c)| m.max(term(i, c)));
        let mut out = *self;
        for (i, c) in out.c.iter_mut().enumerate().rev() {
            if term(i, *c) > threshold {
                break;
            }
            *c = 0.0;
        }
        out
    }
}

impl Add for Poly {
    type Output = Poly;

    fn add(mut self, rhs: Poly) -> Poly {
        for (a, b) in self.c.iter_mut().zip(rhs.c) {
            *a += b;
        }
        self
    }
}

impl Sub for Poly {
    type Output = Poly;

    fn sub(mut self, rhs: Poly) -> Poly {
        for (a, b) in self.c.iter_mut().zip(rhs.c) {
            *a -= b;
        }
        self
    }
}

impl Neg for Poly {
    type Output = Poly;

    fn neg(mut self) -> Poly {
        for a in self.c.iter_mut() {
            *a = -*a;
        }
        self
    }
}

impl Mul for Poly {
    type Output = Poly;

    fn mul(self, rhs: Poly) -> Poly {
        let mut out = Poly::ZERO;
        let (Some(da), Some(db)) = (self.degree(), rhs.degree()) else {
            return out;
        };
        debug_assert!(da + db < POLY_CAPACITY, "polynomial degree overflow");
        for i in 0..=da {
            if self.c[i] == 0.0 {
                continue;
            }
            for j in 0..=db.min(POLY_CAPACITY - 1 - i) {
                out.c[i + j] += self.c[i] * rhs.c[j];
            }
        }
        out
    }
}

impl Mul<f64> for Poly {
    type Output = Poly;

    fn mul(mut self, k: f64) -> Poly {
        for a in self.c.iter_mut() {
            *a *= k;
        }
        self
    }
}

impl Add<f64> for Poly {
    type Output = Poly;

    fn add(mut self, k: f64) -> Poly {
        self.c[0] += k;
        self
    }
}

impl Sub<f64> for Poly {
    type Output = Poly;

    fn sub(mut self, k: f64) -> Poly {
        self.c[0] -= k;
        self
    }
}

/// `rational + irrational·√radicand`, all three polynomials in the same variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surd {
    pub rational: Poly,
    pub irrational: Poly,
    pub radicand: Poly,
}

impl Surd {
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.rational.is_zero() && self.irrational.is_zero()
    }

    #[inline]
    pub fn is_rational(&self) -> bool {
        self.irrational.is_zero()
    }

    /// Square out the root: `rational² − irrational²·radicand`.
    ///
    /// Every zero of the surd (on either branch of the root) is a zero of the
    /// result.
    pub fn eliminate(&self) -> Poly {
        if self.is_rational() {
            self.rational
        } else {
            self.rational * self.rational - self.irrational * self.irrational * self.radicand
        }
    }

    /// Value at `x`, given the (signed) value of the square root there.
    #[inline]
    pub fn eval(&self, x: f64, root: f64) -> f64 {
        let rational = self.rational.eval(x);
        if self.is_rational() {
            rational
        } else {
            rational + self.irrational.eval(x) * root
        }
    }
}

impl Add for Surd {
    type Output = Surd;

    fn add(self, rhs: Surd) -> Surd {
        debug_assert_eq!(self.radicand, rhs.radicand);
        Surd {
            rational: self.rational + rhs.rational,
            irrational: self.irrational + rhs.irrational,
            radicand: self.radicand,
        }
    }
}

impl Sub for Surd {
    type Output = Surd;

    fn sub(self, rhs: Surd) -> Surd {
        debug_assert_eq!(self.radicand, rhs.radicand);
        Surd {
            rational: self.rational - rhs.rational,
            irrational: self.irrational - rhs.irrational,
            radicand: self.radicand,
        }
    }
}

impl Neg for Surd {
    type Output = Surd;

    fn neg(self) -> Surd {
        Surd {
            rational: -self.rational,
            irrational: -self.irrational,
            radicand: self.radicand,
        }
    }
}

impl Mul for Surd {
    type Output = Surd;

    fn mul(self, rhs: Surd) -> Surd {
        debug_assert_eq!(self.radicand, rhs.radicand);
        let mut rational = self.rational * rhs.rational;
        if !self.irrational.is_zero() && !rhs.irrational.is_zero() {
            rational = rational + self.irrational * rhs.irrational * self.radicand;
        }
        Surd {
            rational,
            irrational: self.rational * rhs.irrational + self.irrational * rhs.rational,
            radicand: self.radicand,
        }
    }
}

impl Mul<f64> for Surd {
    type Output = Surd;

    fn mul(self, k: f64) -> Surd {
        Surd {
            rational: self.rational * k,
            irrational: self.irrational * k,
            radicand: self.radicand,
        }
    }
}

impl Add<f64> for Surd {
    type Output = Surd;

    fn add(mut self, k: f64) -> Surd {
        self.rational = self.rational + k;
        self
    }
}

impl Sub<f64> for Surd {
    type Output = Surd;

    fn sub(mut self, k: f64) -> Surd {
        self.rational = self.rational - k;
        self
    }
}

/// Builder for surds sharing one radicand.
///
/// With a zero radicand every surd it builds is a plain polynomial.
#[derive(Debug, Clone, Copy)]
pub struct SurdField {
    radicand: Poly,
}

impl SurdField {
    pub const fn new(radicand: Poly) -> Self {
        Self { radicand }
    }

    /// Field without a square root.
    pub const fn rational() -> Self {
        Self::new(Poly::ZERO)
    }

    #[inline]
    pub fn radicand(&self) -> &Poly {
        &self.radicand
    }

    pub fn poly(&self, p: Poly) -> Surd {
        Surd {
            rational: p,
            irrational: Poly::ZERO,
            radicand: self.radicand,
        }
    }

    pub fn constant(&self, c: f64) -> Surd {
        self.poly(Poly::constant(c))
    }

    /// The free variable `x`.
    pub fn x(&self) -> Surd {
        self.poly(Poly::x())
    }

    /// `√radicand(x)`.
    pub fn root(&self) -> Surd {
        Surd {
            rational: Poly::ZERO,
            irrational: Poly::constant(1.0),
            radicand: self.radicand,
        }
    }
}
