//! Common interpolation trait.

use crate::types::InterpolationError;
use num_traits::Float;

/// One-dimensional interpolator.
pub trait Interpolator<T: Float> {
    /// Interpolate the value at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::OutOfBounds`] when `x` lies outside [`Interpolator::domain`].
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Valid interpolation range `(x_min, x_max)`.
    fn domain(&self) -> (T, T);
}
