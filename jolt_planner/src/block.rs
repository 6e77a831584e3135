//! Minimum duration and blocked duration intervals of a single axis.

use crate::profile::Profile;

/// Open range `(left, right)` of total durations without a valid profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower duration bound [s] (exclusive).
    pub left: f64,
    /// Upper duration bound [s] (exclusive); a valid profile exists here.
    pub right: f64,
    /// Profile realizing `right`.
    pub profile: Profile,
}

impl Interval {
    /// Interval between two candidate profiles, in either order.
    pub fn between(first: &Profile, second: &Profile) -> Self {
        let (lower, upper) = if first.duration() <= second.duration() {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            left: lower.duration(),
            right: upper.duration(),
            profile: *upper,
        }
    }

    /// `t` lies strictly inside the interval.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.left < t && t < self.right
    }
}

/// Feasible durations of one axis: `[t_min, ∞)` minus up to two intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    /// Minimum total duration including the brake [s].
    pub t_min: f64,
    /// Profile realizing `t_min`.
    pub p_min: Profile,
    pub a: Option<Interval>,
    pub b: Option<Interval>,
}

impl Block {
    /// Block without intervals.
    pub fn new(p_min: Profile) -> Self {
        Self {
            t_min: p_min.duration(),
            p_min,
            a: None,
            b: None,
        }
    }

    /// No profile exists for total duration `t`.
    #[inline]
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min
            || self.a.as_ref().is_some_and(|a| a.contains(t))
            || self.b.as_ref().is_some_and(|b| b.contains(t))
    }

    /// Profile already known for duration `t`: `p_min` or an interval's right edge.
    pub fn profile_at(&self, t: f64, tolerance: f64) -> Option<&Profile> {
        if (t - self.t_min).abs() <= tolerance {
            return Some(&self.p_min);
        }
        [self.a.as_ref(), self.b.as_ref()]
            .into_iter()
            .flatten()
            .find(|interval| (t - interval.right).abs() <= tolerance)
            .map(|interval| &interval.profile)
    }

    /// Blocked intervals as `(left, right)` pairs.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        [self.a.as_ref(), self.b.as_ref()]
            .into_iter()
            .flatten()
            .map(|interval| (interval.left, interval.right))
    }
}
