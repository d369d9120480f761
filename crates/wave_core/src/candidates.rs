//! Analytic candidate generation.
//!
//! `sin(ω1·t + φ1) = sin(ω2·t + φ2)` holds exactly when either
//!
//! - `ω1·t + φ1 = ω2·t + φ2 + 2πk` (equal angles), or
//! - `ω1·t + φ1 = π − (ω2·t + φ2) + 2πk` (supplementary angles).
//!
//! Both families are enumerated over the integers `k` whose solutions can land
//! inside the window. The resulting offsets are only approximate (rounding in
//! `φ` and `ω`) and are handed to the refiner.

use crate::settings::SolverSettings;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::traits::PeriodicSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionFamily {
    EqualAngle,
    Supplementary,
    /// Sample of two waves that coincide for all time.
    Coincident,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Days from the window start.
    pub offset: f64,
    pub family: SolutionFamily,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    pub candidates: Vec<Candidate>,
    /// The two waves are identical; `candidates` holds representative samples.
    pub coincident: bool,
    /// At least one family hit `max_candidates_per_family`.
    pub truncated: bool,
}

/// Enumerates approximate intersection offsets in `[0, window_days)`.
///
/// Equal-angle candidates come first, then supplementary ones, each family in
/// ascending order.
pub fn generate_candidates<S: PeriodicSignal<f64>>(
    a: &S,
    b: &S,
    window_days: f64,
    settings: &SolverSettings,
) -> CandidateSet {
    let mut set = CandidateSet::default();
    if !(window_days.is_finite() && window_days > 0.0) {
        return set;
    }

    let (w1, w2) = (a.angular_rate(), b.angular_rate());
    let (p1, p2) = (a.phase_angle(), b.phase_angle());

    if rates_match(w1, w2, settings.period_tolerance) {
        if angles_match(p1, p2, settings.phase_tolerance) {
            let samples = settings.coincident_samples.max(1);
            set.coincident = true;
            set.candidates = (0..samples)
                .map(|i| Candidate {
                    offset: window_days * i as f64 / samples as f64,
                    family: SolutionFamily::Coincident,
                })
                .collect();
            return set;
        }
        // Same rate, different phase: the equal-angle family has no solutions.
    } else {
        set.truncated |= enumerate_family(
            p2 - p1,
            w1 - w2,
            window_days,
            settings.max_candidates_per_family,
            SolutionFamily::EqualAngle,
            &mut set.candidates,
        );
    }

    set.truncated |= enumerate_family(
        PI - p1 - p2,
        w1 + w2,
        window_days,
        settings.max_candidates_per_family,
        SolutionFamily::Supplementary,
        &mut set.candidates,
    );
    set
}

fn rates_match(w1: f64, w2: f64, relative_tolerance: f64) -> bool {
    (w1 - w2).abs() <= relative_tolerance * w1.abs().max(w2.abs())
}

fn angles_match(p1: f64, p2: f64, tolerance: f64) -> bool {
    let diff = (p1 - p2).rem_euclid(TAU);
    diff < tolerance || TAU - diff < tolerance
}

/// Pushes every `t = (base + 2πk) / rate` in `[0, window)`, ascending.
/// Returns `true` when the cap cut the family short.
fn enumerate_family(
    base: f64,
    rate: f64,
    window: f64,
    cap: usize,
    family: SolutionFamily,
    out: &mut Vec<Candidate>,
) -> bool {
    if !(rate.is_finite() && base.is_finite()) || rate == 0.0 {
        return false;
    }

    // t ∈ [0, window)  ⇔  2πk ∈ [-base, rate·window − base] (ordered by sign of rate)
    let k_at_start = -base / TAU;
    let k_at_end = (rate * window - base) / TAU;
    let (lo, hi) = if k_at_start <= k_at_end {
        (k_at_start, k_at_end)
    } else {
        (k_at_end, k_at_start)
    };
    if !(lo.is_finite() && hi.is_finite()) {
        return false;
    }
    let k_min = lo.floor() - 1.0;
    let k_max = hi.ceil() + 1.0;

    let start = out.len();
    let mut truncated = false;
    let mut k = k_min;
    while k <= k_max {
        let t = (base + TAU * k) / rate;
        if (0.0..window).contains(&t) {
            if out.len() - start == cap {
                truncated = true;
                break;
            }
            out.push(Candidate { offset: t, family });
        }
        k += 1.0;
    }

    out[start..].sort_by(|x, y| x.offset.total_cmp(&y.offset));
    truncated
}
