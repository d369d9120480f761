//! Wave phase model.
//!
//! A wave's phase at an instant is its fractional position within the period,
//! measured from the wave's origin (the shared epoch unless the wave carries
//! its own). Its value is `amplitude * sin(2π * phase)`.

use crate::time::ONE_DAY_MS;
use crate::traits::{PeriodicSignal, Scalar};
use crate::wave::Wave;

fn two_pi<T: Scalar>() -> T {
    T::PI() + T::PI()
}

/// Fractional phase in `[0, 1)` for a signed number of days since the origin.
pub fn phase_fraction<T: Scalar>(days_since_origin: T, period: T) -> T {
    let mut raw = days_since_origin % period;
    if raw < T::zero() {
        raw = raw + period;
    }
    let phase = raw / period;
    // A tiny negative remainder plus `period` can round up to exactly `period`.
    if phase >= T::one() {
        T::zero()
    } else {
        phase
    }
}

pub fn value_for_phase<T: Scalar>(amplitude: T, phase: T) -> T {
    amplitude * (two_pi::<T>() * phase).sin()
}

/// Closed-form `amplitude * sin(omega * t + phi)` with `t` in days from a
/// reference instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveEquation<T = f64> {
    pub amplitude: T,
    pub omega: T,
    pub phi: T,
}

impl<T: Scalar> WaveEquation<T> {
    pub fn new(amplitude: T, period: T, phase: T) -> Self {
        Self {
            amplitude,
            omega: two_pi::<T>() / period,
            phi: two_pi::<T>() * phase,
        }
    }
}

impl<T: Scalar> PeriodicSignal<T> for WaveEquation<T> {
    fn angular_rate(&self) -> T {
        self.omega
    }

    fn phase_angle(&self) -> T {
        self.phi
    }

    fn value(&self, t: T) -> T {
        self.amplitude * (self.omega * t + self.phi).sin()
    }

    fn slope(&self, t: T) -> T {
        self.amplitude * self.omega * (self.omega * t + self.phi).cos()
    }
}

/// Evaluates waves against a shared epoch and amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseModel {
    pub epoch: f64,
    pub amplitude: f64,
}

impl PhaseModel {
    pub fn new(epoch: f64, amplitude: f64) -> Self {
        Self { epoch, amplitude }
    }

    pub fn origin_for(&self, wave: &Wave) -> f64 {
        wave.origin.unwrap_or(self.epoch)
    }

    pub fn days_since_origin(&self, wave: &Wave, instant: f64) -> f64 {
        (instant - self.origin_for(wave)) / ONE_DAY_MS
    }

    pub fn phase(&self, wave: &Wave, instant: f64) -> f64 {
        phase_fraction(self.days_since_origin(wave, instant), wave.period)
    }

    pub fn value_at(&self, wave: &Wave, instant: f64) -> f64 {
        value_for_phase(self.amplitude, self.phase(wave, instant))
    }

    /// The wave written relative to `reference`, so that `t = 0` is that
    /// instant. Keeps the trigonometric arguments small however far the
    /// reference is from the origin.
    pub fn equation(&self, wave: &Wave, reference: f64) -> WaveEquation<f64> {
        WaveEquation::new(self.amplitude, wave.period, self.phase(wave, reference))
    }
}
