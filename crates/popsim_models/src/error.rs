//! Error types for object-model construction and sampling.

use popsim_core::types::InterpolationError;
use thiserror::Error;

/// Object-model errors.
///
/// Every variant is a configuration problem detected while building a model
/// or before any sampling starts; sampling itself never fails transiently.
///
/// # Examples
/// ```
/// use popsim_models::ModelError;
///
/// let err = ModelError::Unsupported {
///     kind: "scatter model",
///     name: "g12".to_string(),
///     supported: &["g10", "c11"],
/// };
/// assert!(err.to_string().contains("\"g10\""));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A named option is not one of the supported values.
    #[error("Unsupported {kind} '{name}': supported values are {supported:?}")]
    Unsupported {
        /// What was being selected (e.g. "dust law")
        kind: &'static str,
        /// Name given in the configuration
        name: String,
        /// Names that would have been accepted
        supported: &'static [&'static str],
    },

    /// The source model cannot provide a flux covariance.
    #[error("Source model '{0}' has no flux covariance available")]
    NoFluxCovariance(String),

    /// A parameter name is not exposed by the source model.
    #[error("Source model '{model}' has no parameter '{name}'")]
    UnknownParameter {
        /// Source model name
        model: String,
        /// Requested parameter name
        name: String,
    },

    /// A numeric setting is out of its valid range.
    #[error("Invalid {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// A distribution specification has the wrong shape.
    #[error("Invalid distribution for {name}: {reason}")]
    InvalidDistribution {
        /// Parameter the distribution is for
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// An output column does not have one value per object.
    #[error("Column '{name}' has {got} values, expected {expected}")]
    ColumnLength {
        /// Column name
        name: String,
        /// Values supplied
        got: usize,
        /// Number of objects
        expected: usize,
    },

    /// Tabulated distribution construction failed.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_lists_names() {
        let err = ModelError::Unsupported {
            kind: "dust law",
            name: "xyz".to_string(),
            supported: &["ccm89", "od94", "f99"],
        };
        let msg = err.to_string();
        assert!(msg.contains("dust law 'xyz'"));
        assert!(msg.contains("\"ccm89\", \"od94\", \"f99\""));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = ModelError::InvalidParameter {
            name: "sigma",
            value: -0.1,
            reason: "must be non-negative",
        };
        assert_eq!(err.to_string(), "Invalid sigma = -0.1: must be non-negative");
    }

    #[test]
    fn test_interpolation_error_converts() {
        let err: ModelError = InterpolationError::InsufficientData { got: 1, need: 2 }.into();
        assert!(matches!(err, ModelError::Interpolation(_)));
    }
}
