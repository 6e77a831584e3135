//! Fixed-duration step.
//!
//! Finds one profile that reaches the goal after exactly `tf` seconds
//! (excluding the brake). Cases are walked in the same order as in
//! [`Step1`](super::Step1) and the first valid profile wins.
//!
//! Cruise cases allow either jerk pattern; their cruise duration absorbs the
//! rest of `tf`. Cases without cruise use the UDUD pattern and are
//! parametrised by the acceleration `a3` between the two segments, which
//! also covers the UDDU shapes that do not cross zero acceleration.

use jolt_common::consts::{T_PRECISION, TIME_EPS, scaled};
use jolt_common::kinematics::{KinematicLimits, KinematicState};
use tracing::{debug, trace};

use super::parametric::{Family, even_quadratic, widen};
use super::{Derived, Heading};
use crate::math::{Poly, Surd, SurdField, solve_quadratic};
use crate::profile::{Limits, Profile, Teeth};

type CaseFn = fn(&Step2, &Heading) -> Option<Profile>;

const CASES: [(Limits, CaseFn); 8] = [
    (Limits::ACC0_ACC1_VEL, Step2::time_acc0_acc1_vel),
    (Limits::ACC1_VEL, Step2::time_acc1_vel),
    (Limits::ACC0_VEL, Step2::time_acc0_vel),
    (Limits::VEL, Step2::time_vel),
    (Limits::ACC0_ACC1, Step2::time_acc0_acc1),
    (Limits::ACC1, Step2::time_acc1),
    (Limits::ACC0, Step2::time_acc0),
    (Limits::NONE, Step2::time_none),
];

const CRUISE_TEETH: [Teeth; 2] = [Teeth::Uddu, Teeth::Udud];

/// Fixed-duration solver of one axis.
#[derive(Debug, Clone)]
pub struct Step2 {
    tf: f64,
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    derived: Derived,
}

impl Step2 {
    /// Solver for `tf` seconds from the post-brake `start` to `goal`.
    pub fn new(tf: f64, start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        Self {
            tf,
            start: *start,
            goal: *goal,
            limits: *limits,
            derived: Derived::new(start, goal, limits),
        }
    }

    /// First valid profile of duration `tf`, carrying the brake of `input`.
    pub fn get_profile(&self, input: &Profile) -> Option<Profile> {
        if !self.tf.is_finite() || self.tf < 0.0 {
            debug!(tf = self.tf, "invalid step2 duration");
            return None;
        }

        for heading in Heading::both(&self.limits) {
            for (limits, case) in CASES {
                if let Some(mut profile) = case(self, &heading) {
                    profile.inherit_brake(input);
                    trace!(case = %limits, direction = ?heading.direction, tf = self.tf, "step2 profile");
                    return Some(profile);
                }
            }
        }

        debug!(tf = self.tf, start = ?self.start, goal = ?self.goal, "no profile for duration");
        None
    }

    /// Check a family's candidates against the goal and the duration.
    fn first_valid(&self, h: &Heading, teeth: Teeth, limits: Limits, family: Family) -> Option<Profile> {
        let mut found = None;
        family.solve(&self.start, self.goal.p, |t| {
            let mut profile = Profile::from_phases(&self.start, t, family.jerks);
            profile.limits = limits;
            profile.teeth = teeth;
            profile.direction = h.direction;
            let valid = profile.check(&self.goal, &self.limits)
                && (profile.t_sum[6] - self.tf).abs() <= scaled(T_PRECISION, self.tf);
            if valid {
                found = Some(profile);
            }
            valid
        });
        found
    }

    /// Family whose cruise (phase 3) takes whatever `tf` leaves.
    fn cruise_family(
        &self,
        h: &Heading,
        teeth: Teeth,
        mut times: [Surd; 7],
        field: SurdField,
        domain: (f64, f64),
    ) -> Family {
        let others = times
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .fold(field.constant(0.0), |sum, (_, &t)| sum + t);
        times[3] = field.constant(self.tf) - others;
        Family {
            jerks: teeth.jerks(h.j),
            times,
            field,
            domain,
        }
    }

    fn udud_family(&self, h: &Heading, times: [Surd; 7], field: SurdField) -> Family {
        Family {
            jerks: Teeth::Udud.jerks(h.j),
            times,
            field,
            domain: widen(-self.limits.a_max, self.limits.a_max),
        }
    }

    // ─── Cruise cases ────────────────────────────────────────────────

    fn time_acc0_acc1_vel(&self, h: &Heading) -> Option<Profile> {
        CRUISE_TEETH.into_iter().find_map(|teeth| self.cruise_acc0_acc1(h, teeth))
    }

    fn time_acc1_vel(&self, h: &Heading) -> Option<Profile> {
        CRUISE_TEETH.into_iter().find_map(|teeth| self.cruise_acc1(h, teeth))
    }

    fn time_acc0_vel(&self, h: &Heading) -> Option<Profile> {
        CRUISE_TEETH.into_iter().find_map(|teeth| self.cruise_acc0(h, teeth))
    }

    fn time_vel(&self, h: &Heading) -> Option<Profile> {
        CRUISE_TEETH.into_iter().find_map(|teeth| self.cruise_none(h, teeth))
    }

    /// Both plateaus; free variable: cruise velocity.
    fn cruise_acc0_acc1(&self, h: &Heading, teeth: Teeth) -> Option<Profile> {
        let d = self.derived;
        let (j, j2, a1, a5) = (h.j, h.j2(teeth), h.a, h.a2(teeth));
        let (v0, vf) = (self.start.v, self.goal.v);

        let f = SurdField::rational();
        let vp = f.x();
        let times = [
            f.constant((a1 - self.start.a) / j),
            (vp - v0 - (2.0 * d.a_max_a_max - d.a0_a0) / (2.0 * j)) * (1.0 / a1),
            f.constant(a1 / j),
            f.constant(0.0),
            f.constant(a5 / j2),
            (-vp + vf - (2.0 * d.a_max_a_max - d.af_af) / (2.0 * j2)) * (1.0 / a5),
            f.constant((a5 - self.goal.a) / j2),
        ];
        let domain = widen(self.limits.v_min, self.limits.v_max);
        let family = self.cruise_family(h, teeth, times, f, domain);
        self.first_valid(h, teeth, Limits::ACC0_ACC1_VEL, family)
    }

    /// Plateau in the second segment; free variable: first peak acceleration.
    fn cruise_acc1(&self, h: &Heading, teeth: Teeth) -> Option<Profile> {
        let d = self.derived;
        let (j, j2, a5) = (h.j, h.j2(teeth), h.a2(teeth));

        let f = SurdField::rational();
        let x = f.x();
        let vp = f.poly(self.peak_velocity_after_rise(j));
        let times = [
            (x - self.start.a) * (1.0 / j),
            f.constant(0.0),
            x * (1.0 / j),
            f.constant(0.0),
            f.constant(a5 / j2),
            (-vp + self.goal.v - (2.0 * d.a_max_a_max - d.af_af) / (2.0 * j2)) * (1.0 / a5),
            f.constant((a5 - self.goal.a) / j2),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        let family = self.cruise_family(h, teeth, times, f, domain);
        self.first_valid(h, teeth, Limits::ACC1_VEL, family)
    }

    /// Plateau in the first segment; free variable: second peak acceleration.
    fn cruise_acc0(&self, h: &Heading, teeth: Teeth) -> Option<Profile> {
        let d = self.derived;
        let (j, j2, a1) = (h.j, h.j2(teeth), h.a);
        let (vf, af) = (self.goal.v, self.goal.a);

        let f = SurdField::rational();
        let x = f.x();
        let vp = f.poly(even_quadratic(vf + d.af_af / (2.0 * j2), -1.0 / j2));
        let times = [
            f.constant((a1 - self.start.a) / j),
            (vp - self.start.v - (2.0 * d.a_max_a_max - d.a0_a0) / (2.0 * j)) * (1.0 / a1),
            f.constant(a1 / j),
            f.constant(0.0),
            x * (1.0 / j2),
            f.constant(0.0),
            (x - af) * (1.0 / j2),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        let family = self.cruise_family(h, teeth, times, f, domain);
        self.first_valid(h, teeth, Limits::ACC0_VEL, family)
    }

    /// No plateau; free variable: first peak acceleration, the second one is a root.
    fn cruise_none(&self, h: &Heading, teeth: Teeth) -> Option<Profile> {
        let (j, j2) = (h.j, h.j2(teeth));
        let (vf, af) = (self.goal.v, self.goal.a);

        // a5² = j2·(vf − vp(x)) + af²/2
        let radicand = (self.peak_velocity_after_rise(j) * -j2) + (j2 * vf + af * af / 2.0);
        let f = SurdField::new(radicand);
        let x = f.x();
        let a5 = f.root();
        let times = [
            (x - self.start.a) * (1.0 / j),
            f.constant(0.0),
            x * (1.0 / j),
            f.constant(0.0),
            a5 * (1.0 / j2),
            f.constant(0.0),
            (a5 - af) * (1.0 / j2),
        ];
        let domain = widen(-self.limits.a_max, self.limits.a_max);
        let family = self.cruise_family(h, teeth, times, f, domain);
        self.first_valid(h, teeth, Limits::VEL, family)
    }

    /// `vp(x) = v0 + (2x² − a0²) / (2j)`: velocity once peak `x` is ramped to zero.
    fn peak_velocity_after_rise(&self, j: f64) -> Poly {
        even_quadratic(self.start.v - self.derived.a0_a0 / (2.0 * j), 1.0 / j)
    }

    // ─── Cases without cruise ────────────────────────────────────────

    /// Both plateaus. For a given `a3` the plateau durations share a fixed
    /// sum, so `a3` follows from the velocity change alone and the split
    /// between the plateaus from the position.
    fn time_acc0_acc1(&self, h: &Heading) -> Option<Profile> {
        let d = self.derived;
        let (j, sa) = (h.j, h.a);
        let (a0, af) = (self.start.a, self.goal.a);

        // Plateau sum L(y) = base + 2y/j.
        let base = self.tf - (4.0 * sa - d.a_sum) / j;
        let c0 = sa * base + (4.0 * d.a_max_a_max - d.a0_a0 - d.af_af) / (2.0 * j) - d.vd;
        let (lo, hi) = widen(-self.limits.a_max, self.limits.a_max);

        for &y in solve_quadratic(-1.0 / j, 2.0 * sa / j, c0).iter() {
            if !(lo..=hi).contains(&y) {
                continue;
            }
            let plateaus = base + 2.0 * y / j;
            if plateaus < -TIME_EPS {
                continue;
            }
            let plateaus = plateaus.max(0.0);

            let f = SurdField::rational();
            let t1 = f.x();
            let times = [
                f.constant((sa - a0) / j),
                t1,
                f.constant((sa - y) / j),
                f.constant(0.0),
                f.constant((sa - y) / j),
                -t1 + plateaus,
                f.constant((sa - af) / j),
            ];
            let family = Family {
                jerks: Teeth::Udud.jerks(j),
                times,
                field: f,
                domain: widen(0.0, plateaus),
            };
            if let Some(profile) = self.first_valid(h, Teeth::Udud, Limits::ACC0_ACC1, family) {
                return Some(profile);
            }
        }
        None
    }

    /// Radicand shared by the single-plateau cases; the free peak is `sa ± √r / 4`.
    fn single_plateau_radicand(&self, h: &Heading) -> Poly {
        let d = self.derived;
        let (j, sa) = (h.j, h.a);
        let g0 = -2.0 * d.a_max_a_max - d.a0_a0 - d.af_af + 2.0 * sa * j * self.tf + 2.0 * sa * d.a_sum
            - 2.0 * j * d.vd;
        Poly::from_coeffs(&[16.0 * d.a_max_a_max - 8.0 * g0, -32.0 * sa, 16.0])
    }

    /// Plateau in the first segment; free variable: `a3`.
    fn time_acc0(&self, h: &Heading) -> Option<Profile> {
        let (j, sa) = (h.j, h.a);
        let (a0, af) = (self.start.a, self.goal.a);

        let f = SurdField::new(self.single_plateau_radicand(h));
        let y = f.x();
        let a5 = f.root() * 0.25 + sa;
        let times = [
            f.constant((sa - a0) / j),
            (y * 2.0 - a5 * 2.0 - (2.0 * sa - a0 - af)) * (1.0 / j) + self.tf,
            (-y + sa) * (1.0 / j),
            f.constant(0.0),
            (a5 - y) * (1.0 / j),
            f.constant(0.0),
            (a5 - af) * (1.0 / j),
        ];
        self.first_valid(h, Teeth::Udud, Limits::ACC0, self.udud_family(h, times, f))
    }

    /// Plateau in the second segment; free variable: `a3`.
    fn time_acc1(&self, h: &Heading) -> Option<Profile> {
        let (j, sa) = (h.j, h.a);
        let (a0, af) = (self.start.a, self.goal.a);

        let f = SurdField::new(self.single_plateau_radicand(h));
        let y = f.x();
        let a1 = f.root() * 0.25 + sa;
        let times = [
            (a1 - a0) * (1.0 / j),
            f.constant(0.0),
            (a1 - y) * (1.0 / j),
            f.constant(0.0),
            (-y + sa) * (1.0 / j),
            (y * 2.0 - a1 * 2.0 - (2.0 * sa - a0 - af)) * (1.0 / j) + self.tf,
            f.constant((sa - af) / j),
        ];
        self.first_valid(h, Teeth::Udud, Limits::ACC1, self.udud_family(h, times, f))
    }

    /// No plateau; free variable: `a3`. The peaks split `a3 + h` by `±√r`.
    fn time_none(&self, h: &Heading) -> Option<Profile> {
        let d = self.derived;
        let j = h.j;
        let (a0, af) = (self.start.a, self.goal.a);
        let half = (j * self.tf + d.a_sum) / 2.0;
        let m = j * d.vd + (d.a0_a0 + d.af_af) / 2.0;

        let f = SurdField::new(Poly::from_coeffs(&[2.0 * m - half * half, -2.0 * half, 1.0]));
        let y = f.x();
        let a1 = (y + half + f.root()) * 0.5;
        let a5 = (y + half - f.root()) * 0.5;
        let times = [
            (a1 - a0) * (1.0 / j),
            f.constant(0.0),
            (a1 - y) * (1.0 / j),
            f.constant(0.0),
            (a5 - y) * (1.0 / j),
            f.constant(0.0),
            (a5 - af) * (1.0 / j),
        ];
        self.first_valid(h, Teeth::Udud, Limits::NONE, self.udud_family(h, times, f))
    }
}
