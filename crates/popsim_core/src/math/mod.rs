//! Mathematical utilities.
//!
//! - [`interpolators`]: Piecewise linear interpolation used for inverse-transform sampling
//! - [`quadrature`]: Fixed-order Gauss-Legendre and composite Simpson integration

pub mod interpolators;
pub mod quadrature;
