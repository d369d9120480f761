//! Root acceptance and per-pair deduplication.

use crate::candidates::SolutionFamily;
use crate::settings::SolverSettings;
use crate::traits::PeriodicSignal;
use serde::{Deserialize, Serialize};

/// An instant at which two waves have equal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intersection {
    /// Absolute instant (ms since the Unix epoch).
    pub time: f64,
    pub wave_a: String,
    pub wave_b: String,
    /// Value of `wave_a` at `time`.
    pub value: f64,
    /// `|y1 − y2|` fell below the exact tolerance.
    pub exact: bool,
}

/// A root that passed validation, still expressed as a window offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedRoot {
    pub offset: f64,
    pub value: f64,
    pub difference: f64,
    pub exact: bool,
    pub family: SolutionFamily,
}

/// Re-evaluates both waves at `offset` and accepts the root if they agree
/// within `validation_tolerance`.
pub fn validate_root<S: PeriodicSignal<f64>>(
    a: &S,
    b: &S,
    offset: f64,
    family: SolutionFamily,
    settings: &SolverSettings,
) -> Option<AcceptedRoot> {
    let value = a.value(offset);
    let difference = (value - b.value(offset)).abs();
    if !(difference < settings.validation_tolerance) {
        return None;
    }
    Some(AcceptedRoot {
        offset,
        value,
        difference,
        exact: difference < settings.exact_tolerance,
        family,
    })
}

/// Accepts a sample from a coincident pair. The generator already judged the
/// two curves identical, so the sample is kept and tagged exact on every day.
pub fn coincident_root<S: PeriodicSignal<f64>>(a: &S, b: &S, offset: f64) -> AcceptedRoot {
    let value = a.value(offset);
    AcceptedRoot {
        offset,
        value,
        difference: (value - b.value(offset)).abs(),
        exact: true,
        family: SolutionFamily::Coincident,
    }
}

/// Collects accepted roots for one wave pair, dropping any root within the
/// duplicate window of one already kept. First found wins.
#[derive(Debug, Clone)]
pub struct PairAccumulator {
    duplicate_window_days: f64,
    roots: Vec<AcceptedRoot>,
}

impl PairAccumulator {
    pub fn new(settings: &SolverSettings) -> Self {
        Self {
            duplicate_window_days: settings.duplicate_window_days(),
            roots: Vec::new(),
        }
    }

    pub fn is_duplicate(&self, offset: f64) -> bool {
        self.roots
            .iter()
            .any(|root| (root.offset - offset).abs() < self.duplicate_window_days)
    }

    /// Returns `false` when the root was discarded as a duplicate.
    pub fn push(&mut self, root: AcceptedRoot) -> bool {
        if self.is_duplicate(root.offset) {
            return false;
        }
        self.roots.push(root);
        true
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Kept roots in ascending offset order.
    pub fn finish(mut self) -> Vec<AcceptedRoot> {
        self.roots.sort_by(|x, y| x.offset.total_cmp(&y.offset));
        self.roots
    }
}
