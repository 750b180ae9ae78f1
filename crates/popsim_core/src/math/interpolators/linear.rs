//! Linear interpolation implementation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over non-decreasing abscissae.
///
/// Unlike a general-purpose interpolator the data is *not* re-sorted: the
/// abscissae must already be non-decreasing. This is what tabulated
/// cumulative distributions look like, and keeping the caller's order means
/// tied abscissae resolve the same way every time.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use popsim_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 2.0, 4.0, 6.0];
///
/// let interp = LinearInterpolator::new(&xs, &ys).unwrap();
/// assert_eq!(interp.domain(), (0.0, 3.0));
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    /// Non-decreasing x-coordinates
    xs: Vec<T>,
    /// Corresponding y-values
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct a linear interpolator from x and y data points.
    ///
    /// # Arguments
    ///
    /// * `xs` - Non-decreasing x-coordinates
    /// * `ys` - Corresponding y-values
    ///
    /// # Returns
    ///
    /// * `Ok(LinearInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 data points
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    /// * `Err(InterpolationError::NonMonotonicData)` - `xs` decreases somewhere
    ///
    /// # Example
    ///
    /// ```
    /// use popsim_core::math::interpolators::LinearInterpolator;
    ///
    /// // Valid construction
    /// let interp = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
    ///
    /// // Insufficient data
    /// let result = LinearInterpolator::new(&[0.0], &[0.0]);
    /// assert!(result.is_err());
    /// ```
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }

        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }

        if let Some(index) = xs.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(InterpolationError::NonMonotonicData { index: index + 1 });
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Returns a reference to the x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns a reference to the y-values.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of data points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if the interpolator has no data points.
    /// Note: This should never be true for a valid interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Interpolate with the end values held constant outside the domain.
    ///
    /// Queries at or below `x_min` return the first y-value and queries at or
    /// above `x_max` return the last one, so no extrapolation ever happens.
    ///
    /// # Example
    ///
    /// ```
    /// use popsim_core::math::interpolators::LinearInterpolator;
    ///
    /// let interp = LinearInterpolator::new(&[0.0, 1.0], &[10.0, 20.0]).unwrap();
    /// assert_eq!(interp.interpolate_clamped(-1.0), 10.0);
    /// assert_eq!(interp.interpolate_clamped(0.5), 15.0);
    /// assert_eq!(interp.interpolate_clamped(2.0), 20.0);
    /// ```
    pub fn interpolate_clamped(&self, x: T) -> T {
        let last = self.xs.len() - 1;
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[last] {
            return self.ys[last];
        }
        self.segment_value(self.find_segment(x), x)
    }

    /// Find the segment index for interpolation using binary search.
    ///
    /// Returns the index `i` such that `xs[i] <= x < xs[i+1]`,
    /// clamped to valid segment range [0, n-2].
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);

        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    #[inline]
    fn segment_value(&self, i: usize, x: T) -> T {
        let x0 = self.xs[i];
        let x1 = self.xs[i + 1];
        let y0 = self.ys[i];
        let y1 = self.ys[i + 1];

        if x1 == x0 {
            return y1;
        }

        let t = (x - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    /// Interpolate value at point `x` using piecewise linear interpolation.
    ///
    /// # Formula
    ///
    /// ```text
    /// y = y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use popsim_core::math::interpolators::{Interpolator, LinearInterpolator};
    ///
    /// let interp = LinearInterpolator::<f64>::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
    ///
    /// let y = interp.interpolate(0.5).unwrap();
    /// assert!((y - 1.0).abs() < 1e-10);
    ///
    /// assert!(interp.interpolate(2.5).is_err());
    /// ```
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (x_min, x_max) = self.domain();

        if x < x_min || x > x_max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: x_min.to_f64().unwrap_or(f64::NAN),
                max: x_max.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(self.segment_value(self.find_segment(x), x))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
