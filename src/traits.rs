use core::fmt::Debug;
use num_traits::Float;

/// Trait for the real floating-point types the numeric routines run on.
///
/// Blanket-implemented for `f32` and `f64`. The root finders, minimizers,
/// quadrature and special functions are generic over it; the sampling layer
/// works in `f64` only.
pub trait FloatScalar: Float + Copy + PartialOrd + Debug {}

impl<T: Float + Copy + PartialOrd + Debug> FloatScalar for T {}

/// Convert an `f64` constant into `T`.
///
/// Every `FloatScalar` can represent (a rounding of) any finite `f64`, so the
/// conversion never fails for the literals used in this crate.
#[inline]
pub(crate) fn cst<T: FloatScalar>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}
