//! Error types for population generation.
//!
//! Every failure is a configuration problem detected at construction time
//! or at the start of a generation call. Generation either returns the full
//! requested batch or one of these errors; partial results are never
//! returned.

use popsim_core::types::{CosmologyError, FootprintError, InterpolationError};
use popsim_models::ModelError;
use thiserror::Error;

/// Population generator errors.
///
/// # Examples
/// ```
/// use popsim_generator::GeneratorError;
///
/// let err = GeneratorError::InvalidRedshiftRange { z_min: 0.1, z_max: 0.1 };
/// assert!(err.to_string().contains("[0.1, 0.1]"));
/// ```
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Missing or malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two options that cannot be combined are both set.
    #[error("'{first}' and '{second}' cannot both be configured")]
    MutuallyExclusive {
        /// First option
        first: &'static str,
        /// Second option
        second: &'static str,
    },

    /// Redshift range is empty, reversed, negative or not finite.
    #[error("Invalid redshift range [{z_min}, {z_max}]: need 0 <= z_min < z_max")]
    InvalidRedshiftRange {
        /// Lower bound
        z_min: f64,
        /// Upper bound
        z_max: f64,
    },

    /// The rate integrates to zero (or not a finite number) over the range.
    #[error("Rate {rate_z0}·(1+z)^{power} gives no objects on [{z_min}, {z_max}] (total {total})")]
    EmptyRate {
        /// Rate at z = 0
        rate_z0: f64,
        /// Power-law index
        power: f64,
        /// Lower redshift bound
        z_min: f64,
        /// Upper redshift bound
        z_max: f64,
        /// Integrated time rate
        total: f64,
    },

    /// A named option is not one of the supported values.
    #[error("Unsupported {kind} '{name}': supported values are {supported:?}")]
    Unsupported {
        /// What was being selected
        kind: &'static str,
        /// Name given
        name: String,
        /// Accepted names
        supported: &'static [&'static str],
    },

    /// Footprint rejection sampling hit its trial cap.
    #[error("No footprint acceptance within {max_trials} consecutive trials")]
    FootprintExhausted {
        /// Configured cap on consecutive rejections
        max_trials: usize,
    },

    /// Configuration needs a collaborator that was not supplied.
    #[error("Configuration requires a {0} but none was supplied")]
    MissingCollaborator(&'static str),

    /// The host catalogue answered with the wrong number of rows.
    #[error("Host catalogue returned {got} rows for {requested} objects")]
    HostCatalogShort {
        /// Rows requested
        requested: usize,
        /// Rows returned
        got: usize,
    },

    /// Generation request is invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration file could not be read.
    #[error("Cannot read configuration '{path}': {message}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        message: String,
    },

    /// Configuration document could not be parsed.
    #[error("Cannot parse configuration: {0}")]
    Parse(String),

    /// Object model error.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Cosmology error.
    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    /// Footprint error.
    #[error(transparent)]
    Footprint(#[from] FootprintError),

    /// Tabulated CDF error.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
