//! Minimum-time step.
//!
//! Every case is tried for both headings and each valid profile is kept in a
//! fixed buffer of [`MAX_VALID_PROFILES`]. The shortest one is the minimum
//! duration; the remaining ones, paired in order of duration, bound the
//! intervals in which no profile exists. When they do not pair up, the gaps
//! between them are tested with [`Step2`].
//!
//! Cases without a cruise phase use the UDDU pattern with the middle jerk
//! phases 2 and 4 merged; the split at the acceleration zero crossing is
//! restored once the durations are numeric.

use heapless::Vec as HVec;
use jolt_common::consts::{DUPLICATE_EPS, MAX_VALID_PROFILES, P_PRECISION, STANDSTILL_EPS, scaled};
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use tracing::{debug, trace};

use super::parametric::{Family, even_quadratic, widen};
use super::{Derived, Heading, Step2, any_negative, ramp_down, ramp_up};
use crate::block::{Block, Interval};
use crate::math::{Surd, SurdField};
use crate::profile::{Limits, Profile, Teeth};

type CaseFn = fn(&mut Step1, &Heading);

/// Case order: cruise cases first, each from most to least limited.
const CASES: [(Limits, CaseFn); 8] = [
    (Limits::ACC0_ACC1_VEL, Step1::time_acc0_acc1_vel),
    (Limits::ACC1_VEL, Step1::time_acc1_vel),
    (Limits::ACC0_VEL, Step1::time_acc0_vel),
    (Limits::VEL, Step1::time_vel),
    (Limits::ACC0_ACC1, Step1::time_acc0_acc1),
    (Limits::ACC1, Step1::time_acc1),
    (Limits::ACC0, Step1::time_acc0),
    (Limits::NONE, Step1::time_none),
];

/// Minimum-time solver of one axis.
#[derive(Debug, Clone)]
pub struct Step1 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    derived: Derived,
    valid_profiles: HVec<Profile, MAX_VALID_PROFILES>,
}

impl Step1 {
    /// Solver from the post-brake `start` to `goal`.
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            derived: Derived::new(start, goal, limits),
            valid_profiles: HVec::new(),
        }
    }

    /// Minimum duration and blocked intervals.
    ///
    /// The brake recorded in `input` is copied onto every profile. Returns
    /// `None` when no case yields a valid profile.
    pub fn get_profile(&mut self, input: &Profile) -> Option<Block> {
        self.valid_profiles.clear();

        if self.is_coincident() {
            let heading = Heading::up(&self.limits);
            self.add_profile([0.0; 7], &heading, Teeth::Uddu, Limits::NONE);
            if self.is_at_rest() {
                return self.calculate_block(input);
            }
        }

        for heading in Heading::both(&self.limits) {
            for (limits, case) in CASES {
                trace!(case = %limits, direction = ?heading.direction, "step1 case");
                case(self, &heading);
            }
        }

        self.calculate_block(input)
    }

    /// Profiles found by the last [`get_profile`](Self::get_profile), in discovery order.
    pub fn valid_profiles(&self) -> &[Profile] {
        &self.valid_profiles
    }

    /// Goal equals start.
    fn is_coincident(&self) -> bool {
        let d = &self.derived;
        d.pd.abs() <= scaled(STANDSTILL_EPS, self.goal.p)
            && d.vd.abs() <= scaled(STANDSTILL_EPS, self.goal.v)
            && (self.goal.a - self.start.a).abs() <= scaled(STANDSTILL_EPS, self.goal.a)
    }

    /// A moving axis needs time to come back to its own state; a resting one does not.
    fn is_at_rest(&self) -> bool {
        self.start.v.abs() <= STANDSTILL_EPS && self.start.a.abs() <= STANDSTILL_EPS
    }

    /// Check a candidate and keep it unless its duration is already known.
    fn add_profile(&mut self, t: [f64; 7], heading: &Heading, teeth: Teeth, limits: Limits) {
        let mut profile = Profile::from_phases(&self.start, t, teeth.jerks(heading.j));
        profile.limits = limits;
        profile.teeth = teeth;
        profile.direction = heading.direction;
        if !profile.check(&self.goal, &self.limits) {
            return;
        }

        let duration = profile.t_sum[6];
        let duplicate = self
            .valid_profiles
            .iter()
            .any(|p| (p.t_sum[6] - duration).abs() <= scaled(DUPLICATE_EPS, duration));
        if duplicate {
            return;
        }

        match self.valid_profiles.push(profile) {
            Ok(()) => trace!(case = %limits, direction = ?heading.direction, duration, "valid profile"),
            Err(_) => trace!(case = %limits, duration, "profile buffer full, candidate dropped"),
        }
    }

    /// Minimum profile plus the intervals between the remaining ones.
    ///
    /// An even number of candidates beyond the minimum pairs up in order of
    /// duration. Otherwise a candidate was lost or found twice, or the minimum
    /// is the zero profile of a moving axis; the intervals are then read off
    /// the gaps instead.
    fn calculate_block(&self, input: &Profile) -> Option<Block> {
        let mut profiles = self.valid_profiles.clone();
        for profile in profiles.iter_mut() {
            profile.inherit_brake(input);
        }
        profiles.sort_unstable_by(|a, b| a.t_sum[6].total_cmp(&b.t_sum[6]));

        let Some((p_min, rest)) = profiles.split_first() else {
            debug!(start = ?self.start, goal = ?self.goal, "no valid profile");
            return None;
        };

        let mut block = Block::new(*p_min);
        let paired = rest.len() % 2 == 0 && (rest.is_empty() || p_min.t_sum[6] > 0.0);
        if paired {
            let mut pairs = rest.chunks_exact(2);
            block.a = pairs.next().map(|pair| Interval::between(&pair[0], &pair[1]));
            block.b = pairs.next().map(|pair| Interval::between(&pair[0], &pair[1]));
        } else {
            debug!(candidates = profiles.len(), "ambiguous pairing, solving gaps");
            let mut intervals = self.blocked_gaps(&profiles, input).into_iter();
            block.a = intervals.next();
            block.b = intervals.next();
            if let Some(extra) = intervals.next() {
                debug!(left = extra.left, right = extra.right, "third blocked interval ignored");
            }
        }

        debug!(
            t_min = block.t_min,
            case = %block.p_min.limits,
            intervals = block.intervals().count(),
            "step1 block"
        );
        Some(block)
    }

    /// Intervals over the gaps between sorted candidates in which no profile of
    /// the mid duration exists; adjacent blocked gaps merge.
    fn blocked_gaps(&self, sorted: &[Profile], input: &Profile) -> HVec<Interval, MAX_VALID_PROFILES> {
        let mut intervals = HVec::new();
        let mut open: Option<&Profile> = None;
        for pair in sorted.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let mid = 0.5 * (lower.t_sum[6] + upper.t_sum[6]);
            let blocked = Step2::new(mid, &self.start, &self.goal, &self.limits)
                .get_profile(input)
                .is_none();
            match (blocked, open) {
                (true, None) => open = Some(lower),
                (false, Some(left)) => {
                    // Fewer gaps than candidates: capacity is never exceeded.
                    let _ = intervals.push(Interval::between(left, lower));
                    open = None;
                }
                _ => {}
            }
        }
        if let (Some(left), Some(right)) = (open, sorted.last()) {
            let _ = intervals.push(Interval::between(left, right));
        }
        intervals
    }

    // ─── Cruise cases ────────────────────────────────────────────────

    fn time_acc0_acc1_vel(&mut self, h: &Heading) {
        self.time_cruise(h, Limits::ACC0_ACC1_VEL);
    }

    fn time_acc1_vel(&mut self, h: &Heading) {
        self.time_cruise(h, Limits::ACC1_VEL);
    }

    fn time_acc0_vel(&mut self, h: &Heading) {
        self.time_cruise(h, Limits::ACC0_VEL);
    }

    fn time_vel(&mut self, h: &Heading) {
        self.time_cruise(h, Limits::VEL);
    }

    /// Ramp to the velocity limit, cruise, ramp to the goal.
    fn time_cruise(&mut self, h: &Heading, limits: Limits) {
        let teeth = Teeth::Uddu;
        let rise_plateau = limits.contains(Limits::ACC0).then_some(h.a);
        let settle_plateau = limits.contains(Limits::ACC1).then_some(h.a2(teeth));

        let Some(rise) = ramp_up(self.start.v, self.start.a, h.v, h.j, rise_plateau) else {
            return;
        };
        let Some(settle) = ramp_down(h.v, self.goal.v, self.goal.a, h.j2(teeth), settle_plateau) else {
            return;
        };
        if any_negative(&rise) || any_negative(&settle) {
            return;
        }

        let mut t = [rise[0], rise[1], rise[2], 0.0, settle[0], settle[1], settle[2]];
        let start = (self.start.p, self.start.v, self.start.a);
        let (p, _, _) = t
            .iter()
            .zip(&teeth.jerks(h.j))
            .fold(start, |(p, v, a), (&ti, &j)| Profile::integrate(ti, p, v, a, j));

        let gap = self.goal.p - p;
        if h.v.abs() <= f64::EPSILON {
            if gap.abs() > scaled(P_PRECISION, self.goal.p) {
                return;
            }
        } else {
            t[3] = gap / h.v;
        }
        self.add_profile(t, h, teeth, limits);
    }

    // ─── Cases without cruise ────────────────────────────────────────

    /// Free variable: duration of the first plateau.
    fn time_acc0_acc1(&mut self, h: &Heading) {
        let d = self.derived;
        let (j, a1, a5) = (h.j, h.a, -h.a);
        // a1·t1 + a5·t5 is fixed by the velocity change; with a5 = −a1 the
        // plateaus differ by a constant.
        let shift = (d.vd - (d.af_af - d.a0_a0) / (2.0 * j)) / a1;

        let f = SurdField::rational();
        let t1 = f.x();
        let times = [
            f.constant((a1 - self.start.a) / j),
            t1,
            f.constant((a1 - a5) / j),
            f.constant(0.0),
            f.constant(0.0),
            t1 - shift,
            f.constant((self.goal.a - a5) / j),
        ];
        let (lo, _) = widen(0.0, 0.0);
        self.solve_merged(h, Limits::ACC0_ACC1, times, f, (lo, f64::INFINITY));
    }

    /// Free variable: peak acceleration of the first segment.
    fn time_acc1(&mut self, h: &Heading) {
        let d = self.derived;
        let j = h.j;
        let a5 = -h.a;

        let f = SurdField::rational();
        let x = f.x();
        let t5 = f.poly(even_quadratic(
            d.vd + (d.a0_a0 + 2.0 * d.a_max_a_max - d.af_af) / (2.0 * j),
            -1.0 / j,
        )) * (1.0 / a5);
        let times = [
            (x - self.start.a) * (1.0 / j),
            f.constant(0.0),
            (x - a5) * (1.0 / j),
            f.constant(0.0),
            f.constant(0.0),
            t5,
            f.constant((self.goal.a - a5) / j),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        self.solve_merged(h, Limits::ACC1, times, f, domain);
    }

    /// Free variable: peak acceleration of the second segment.
    fn time_acc0(&mut self, h: &Heading) {
        let d = self.derived;
        let (j, a1) = (h.j, h.a);

        let f = SurdField::rational();
        let x = f.x();
        let t1 = f.poly(even_quadratic(
            d.vd - (2.0 * d.a_max_a_max - d.a0_a0 + d.af_af) / (2.0 * j),
            1.0 / j,
        )) * (1.0 / a1);
        let times = [
            f.constant((a1 - self.start.a) / j),
            t1,
            (-x + a1) * (1.0 / j),
            f.constant(0.0),
            f.constant(0.0),
            f.constant(0.0),
            (-x + self.goal.a) * (1.0 / j),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        self.solve_merged(h, Limits::ACC0, times, f, domain);
    }

    /// Free variable: first peak acceleration; the second follows from the
    /// velocity change up to the sign of the root.
    fn time_none(&mut self, h: &Heading) {
        let d = self.derived;
        let j = h.j;
        let k = j * d.vd + (d.a0_a0 - d.af_af) / 2.0;

        let f = SurdField::new(even_quadratic(-k, 1.0));
        let x = f.x();
        let a5 = f.root();
        let times = [
            (x - self.start.a) * (1.0 / j),
            f.constant(0.0),
            (x - a5) * (1.0 / j),
            f.constant(0.0),
            f.constant(0.0),
            f.constant(0.0),
            (-a5 + self.goal.a) * (1.0 / j),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        self.solve_merged(h, Limits::NONE, times, f, domain);
    }

    /// Solve a UDDU family whose phase 2 spans both middle jerk phases.
    fn solve_merged(
        &mut self,
        h: &Heading,
        limits: Limits,
        times: [Surd; 7],
        field: SurdField,
        domain: (f64, f64),
    ) {
        let teeth = Teeth::Uddu;
        let family = Family {
            jerks: teeth.jerks(h.j),
            times,
            field,
            domain,
        };
        let (start, pf) = (self.start, self.goal.p);
        family.solve(&start, pf, |mut t| {
            let a1 = start.a + h.j * t[0];
            split_middle(&mut t, a1, h.j);
            self.add_profile(t, h, teeth, limits);
            false
        });
    }
}

/// Split the merged middle phase at the zero crossing of the acceleration.
///
/// Phase 2 starts at `a1` with jerk `−j`; the part after the crossing moves to
/// phase 4, which carries the same jerk.
fn split_middle(t: &mut [f64; 7], a1: f64, j: f64) {
    let t_zero = a1 / j;
    if t_zero > 0.0 && t_zero < t[2] {
        t[4] = t[2] - t_zero;
        t[2] = t_zero;
    }
}
