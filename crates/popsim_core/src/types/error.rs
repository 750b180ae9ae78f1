//! Error types for structured error handling.
//!
//! This module provides:
//! - `InterpolationError`: Errors from interpolation operations
//! - `CosmologyError`: Errors from cosmological model construction
//! - `FootprintError`: Errors from sky footprint construction

use thiserror::Error;

/// Interpolation-related errors.
///
/// # Examples
/// ```
/// use popsim_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Abscissae decrease somewhere.
    #[error("Data is not monotonic at index {index}")]
    NonMonotonicData {
        /// Index of the first offending point
        index: usize,
    },

    /// General invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Cosmological model errors.
///
/// # Examples
/// ```
/// use popsim_core::types::CosmologyError;
///
/// let err = CosmologyError::InvalidHubbleConstant(-70.0);
/// assert!(err.to_string().contains("-70"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CosmologyError {
    /// H0 must be strictly positive and finite.
    #[error("Invalid Hubble constant {0}: must be positive and finite")]
    InvalidHubbleConstant(f64),

    /// A density parameter is negative or not finite.
    #[error("Invalid density parameter {name} = {value}")]
    InvalidDensity {
        /// Parameter name (e.g. "Om0")
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// E(z)² becomes non-positive inside the integration range.
    #[error("Expansion rate is not positive at z = {z}")]
    NonPositiveExpansion {
        /// Redshift where E(z)² <= 0
        z: f64,
    },
}

/// Sky footprint errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    /// A polygon needs at least three vertices.
    #[error("Footprint polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A vertex coordinate is NaN or infinite.
    #[error("Footprint vertex {index} is not finite: ({ra}, {dec})")]
    NonFiniteVertex {
        /// Vertex index
        index: usize,
        /// Right ascension (radians)
        ra: f64,
        /// Declination (radians)
        dec: f64,
    },

    /// The polygon encloses no area, so no point can ever be accepted.
    #[error("Footprint polygon has zero area")]
    ZeroArea,
}
