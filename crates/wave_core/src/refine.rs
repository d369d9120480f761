use crate::settings::SolverSettings;
use crate::traits::PeriodicSignal;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    /// Days from the window start.
    pub offset: f64,
    pub iterations: usize,
}

/// Why a candidate was abandoned. None of these are faults: the pipeline
/// drops the candidate and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RefineFailure {
    #[error("derivative vanished at t = {offset} (|f'| = {slope:e})")]
    FlatDerivative { offset: f64, slope: f64 },
    #[error("iterate left the day window at t = {offset}")]
    LeftWindow { offset: f64 },
    #[error("Newton refinement failed to converge in {iterations} steps")]
    NoConvergence { iterations: usize },
    #[error("iterate became non-finite")]
    NonFinite,
}

/// Newton–Raphson on `f(t) = a(t) − b(t)` starting from `initial`, confined to
/// `[0, window_days)`.
pub fn refine_root<S: PeriodicSignal<f64>>(
    a: &S,
    b: &S,
    initial: f64,
    window_days: f64,
    settings: &SolverSettings,
) -> Result<Refinement, RefineFailure> {
    if !initial.is_finite() {
        return Err(RefineFailure::NonFinite);
    }

    let mut t = initial;
    for iteration in 1..=settings.max_iterations {
        let residual = a.value(t) - b.value(t);
        let slope = a.slope(t) - b.slope(t);

        if slope.abs() < settings.derivative_floor {
            // Tangential contact: already a root, nothing left to step.
            if residual.abs() < settings.exact_tolerance {
                return Ok(Refinement {
                    offset: t,
                    iterations: iteration - 1,
                });
            }
            return Err(RefineFailure::FlatDerivative { offset: t, slope });
        }

        let delta = residual / slope;
        t -= delta;

        if !t.is_finite() {
            return Err(RefineFailure::NonFinite);
        }
        if !(0.0..window_days).contains(&t) {
            return Err(RefineFailure::LeftWindow { offset: t });
        }
        if delta.abs() < settings.step_tolerance {
            return Ok(Refinement {
                offset: t,
                iterations: iteration,
            });
        }
    }

    Err(RefineFailure::NoConvergence {
        iterations: settings.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::WaveEquation;
    use crate::settings::DEFAULT_AMPLITUDE;

    #[test]
    fn refine_converges_from_a_nearby_guess() {
        let a = WaveEquation::new(DEFAULT_AMPLITUDE, 23.0, 0.0);
        let b = WaveEquation::new(DEFAULT_AMPLITUDE, 28.0, 0.0);
        // First supplementary root: (ω1 + ω2)·t = π
        let exact = std::f64::consts::PI / (a.omega + b.omega);
        let refined = refine_root(&a, &b, exact - 0.1, 10.0, &SolverSettings::default())
            .expect("refinement should converge");
        assert!((refined.offset - exact).abs() < 1e-9);
        assert!((a.value(refined.offset) - b.value(refined.offset)).abs() < 1e-10);
        assert!(refined.iterations > 0);
    }

    #[test]
    fn refine_reports_flat_derivative() {
        // Same rate, phases one radian apart: f' vanishes where
        // cos(x) = cos(x + 1), i.e. x = π − 1/2, while f stays near 0.96.
        let a = WaveEquation::new(1.0, 1.0, 0.0);
        let b = WaveEquation { phi: 1.0, ..a };
        let flat = (std::f64::consts::PI - 0.5) / a.omega;
        let settings = SolverSettings {
            derivative_floor: 1e-6,
            ..SolverSettings::default()
        };
        let err = refine_root(&a, &b, flat, 1.0, &settings).expect_err("flat derivative");
        assert!(matches!(err, RefineFailure::FlatDerivative { .. }), "{err}");
    }

    #[test]
    fn refine_accepts_tangential_root() {
        let a = WaveEquation::new(1.0, 1.0, 0.25);
        let b = WaveEquation::new(1.0, 1.0, 0.25);
        let refined =
            refine_root(&a, &b, 0.3, 1.0, &SolverSettings::default()).expect("already a root");
        assert_eq!(refined.iterations, 0);
        assert_eq!(refined.offset, 0.3);
    }

    #[test]
    fn refine_aborts_when_leaving_the_window() {
        let a = WaveEquation::new(1.0, 23.0, 0.0);
        let b = WaveEquation::new(1.0, 28.0, 0.0);
        // Both start at zero phase, so the nearest root is t = 0. The difference
        // bends downward above it and Newton overshoots to t < 0.
        let err = refine_root(&a, &b, 0.5, 1.0, &SolverSettings::default())
            .expect_err("root lies outside the window");
        assert!(matches!(err, RefineFailure::LeftWindow { .. }), "{err}");
    }

    #[test]
    fn refine_respects_iteration_cap() {
        let a = WaveEquation::new(1.0, 0.9, 0.1);
        let b = WaveEquation::new(1.0, 1.3, 0.6);
        let settings = SolverSettings {
            max_iterations: 1,
            ..SolverSettings::default()
        };
        let err = refine_root(&a, &b, 0.2, 1.0, &settings).expect_err("one step is not enough");
        assert!(matches!(
            err,
            RefineFailure::NoConvergence { iterations: 1 } | RefineFailure::LeftWindow { .. }
        ));
    }
}
