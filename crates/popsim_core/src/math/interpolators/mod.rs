//! Interpolation methods for numerical computation.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation between data points
//!
//! ## Core Trait
//!
//! All 1D interpolators implement the [`Interpolator`] trait, which defines:
//! - `interpolate(x: T) -> Result<T, InterpolationError>`: Compute interpolated value
//! - `domain() -> (T, T)`: Return valid interpolation range
//!
//! ## Example
//!
//! ```
//! use popsim_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 4.0, 9.0];
//!
//! let interp = LinearInterpolator::<f64>::new(&xs, &ys).unwrap();
//! let (x_min, x_max) = interp.domain();
//! assert_eq!(x_min, 0.0);
//! assert_eq!(x_max, 3.0);
//!
//! // Interpolate at x = 1.5 (between y=1.0 and y=4.0)
//! let y = interp.interpolate(1.5).unwrap();
//! assert!((y - 2.5).abs() < 1e-10);
//! ```

mod linear;
mod traits;

pub use linear::LinearInterpolator;
pub use traits::Interpolator;
