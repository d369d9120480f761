//! Tunables for the intersection pipeline.

use crate::time::ONE_SECOND_DAYS;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AMPLITUDE: f64 = 100.0;
pub const DEFAULT_CACHE_CAPACITY: usize = 7;

/// Numerical settings shared by candidate generation, refinement and validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverSettings {
    pub max_iterations: usize,
    /// Newton stops once `|Δt|` (days) falls below this.
    pub step_tolerance: f64,
    /// `|f'|` below this counts as a flat derivative.
    pub derivative_floor: f64,
    /// Maximum `|y1 - y2|` for a root to be accepted.
    pub validation_tolerance: f64,
    /// Maximum `|y1 - y2|` for a root to be tagged exact.
    pub exact_tolerance: f64,
    pub duplicate_window_seconds: f64,
    pub max_candidates_per_family: usize,
    /// Samples emitted for a pair of coincident waves.
    pub coincident_samples: usize,
    /// Relative tolerance under which two angular rates are equal.
    pub period_tolerance: f64,
    /// Radians under which two phase angles are equal.
    pub phase_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            step_tolerance: 1e-12,
            derivative_floor: 1e-15,
            validation_tolerance: 1e-8,
            exact_tolerance: 1e-12,
            duplicate_window_seconds: 1.0,
            max_candidates_per_family: 50,
            coincident_samples: 24,
            period_tolerance: 1e-12,
            phase_tolerance: 1e-9,
        }
    }
}

impl SolverSettings {
    pub fn duplicate_window_days(&self) -> f64 {
        self.duplicate_window_seconds * ONE_SECOND_DAYS
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            bail!("max_iterations must be greater than zero.");
        }
        let positive = [
            ("step_tolerance", self.step_tolerance),
            ("derivative_floor", self.derivative_floor),
            ("validation_tolerance", self.validation_tolerance),
            ("exact_tolerance", self.exact_tolerance),
            ("period_tolerance", self.period_tolerance),
            ("phase_tolerance", self.phase_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be positive and finite (got {}).", name, value);
            }
        }
        if !(self.duplicate_window_seconds.is_finite() && self.duplicate_window_seconds >= 0.0) {
            bail!("duplicate_window_seconds must be non-negative.");
        }
        if self.exact_tolerance > self.validation_tolerance {
            bail!("exact_tolerance must not exceed validation_tolerance.");
        }
        if self.max_candidates_per_family == 0 {
            bail!("max_candidates_per_family must be greater than zero.");
        }
        if self.coincident_samples == 0 {
            bail!("coincident_samples must be greater than zero.");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    /// Shared presentation scale applied to every wave.
    pub amplitude: f64,
    pub cache_capacity: usize,
    /// Offset of the collaborator's calendar from UTC.
    pub utc_offset_minutes: i32,
    pub solver: SolverSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            utc_offset_minutes: 0,
            solver: SolverSettings::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.amplitude.is_finite() && self.amplitude > 0.0) {
            bail!("amplitude must be positive and finite (got {}).", self.amplitude);
        }
        if self.cache_capacity == 0 {
            bail!("cache_capacity must be greater than zero.");
        }
        if self.utc_offset_minutes.abs() > 18 * 60 {
            bail!(
                "utc_offset_minutes must be within ±18 hours (got {}).",
                self.utc_offset_minutes
            );
        }
        self.solver.validate()
    }
}
