pub mod cache;
pub mod candidates;
pub mod engine;
pub mod phase;
pub mod refine;
pub mod selection;
pub mod settings;
pub mod time;
/// The `wave_core` crate provides the numerical engine behind the wave chart.
/// It finds the instants within a calendar day at which pairs of periodic
/// sinusoidal waves take equal values.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `PeriodicSignal` (closed-form sinusoids).
/// - **Phase**: phase and value of a wave at an instant, measured from a shared epoch.
/// - **Candidates**: analytic enumeration of the two `sin x = sin y` solution families.
/// - **Refine / Validate**: Newton refinement, tolerance checks and per-pair deduplication.
/// - **Engine**: active-wave selection, pairing, and a bounded per-day result cache.
pub mod traits;
pub mod validate;
pub mod wave;
