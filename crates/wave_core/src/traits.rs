use num_traits::{Float, FloatConst, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in wave evaluation.
/// Must support basic arithmetic, trigonometry, debug printing, and conversion from f64.
pub trait Scalar: Float + FloatConst + FromPrimitive + Debug + 'static {}

impl<T: Float + FloatConst + FromPrimitive + Debug + 'static> Scalar for T {}

/// A sinusoid written relative to a fixed reference instant.
///
/// `t` is always an offset in days from that reference (usually the start of
/// the day being searched), never an absolute timestamp.
pub trait PeriodicSignal<T: Scalar> {
    /// Angular rate in radians per day.
    fn angular_rate(&self) -> T;

    /// Phase angle in radians at `t = 0`.
    fn phase_angle(&self) -> T;

    /// Signed value of the signal at offset `t`.
    fn value(&self, t: T) -> T;

    /// First derivative of `value` with respect to `t`.
    fn slope(&self, t: T) -> T;
}
