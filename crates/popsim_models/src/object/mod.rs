//! Object-type parameter models.
//!
//! Every object type implements the same capability set,
//! [`ObjectParameterModel`]. The orchestrator holds one [`ObjectModel`],
//! chosen when the configuration is read, and dispatches through it without
//! ever inspecting a type name again.
//!
//! ## Example
//!
//! ```
//! use popsim_core::rng::SimRng;
//! use popsim_models::distributions::ShapeDistribution;
//! use popsim_models::magnitude::AbsoluteMagnitude;
//! use popsim_models::object::{ObjectModel, ObjectModelConfig, ObjectParameterModel, SnIaConfig};
//! use popsim_models::params::CommonParams;
//!
//! let config = SnIaConfig::new(
//!     "salt2",
//!     70.0,
//!     AbsoluteMagnitude::Jla,
//!     ShapeDistribution::from_values("x1", &[0.0, 1.0]).unwrap(),
//!     ShapeDistribution::from_values("c", &[0.0, 0.1]).unwrap(),
//! );
//! let model = ObjectModel::init_model(ObjectModelConfig::TypeIa(config)).unwrap();
//! assert_eq!(model.object_type(), "SNIa");
//! assert_eq!(model.general_params().m0, -19.05);
//!
//! let z = [0.1, 0.2];
//! let common = CommonParams { zcos: &z, ra: &[0.0, 1.0], dec: &[0.0, 0.2] };
//! let params = model
//!     .generate_type_params(2, &common, &mut SimRng::from_seed(1))
//!     .unwrap();
//! assert_eq!(params.column("x1").map(|c| c.len()), Some(2));
//! ```

mod snia;

pub use snia::{SnIaConfig, SnIaModel};

use popsim_core::rng::SimRng;

use crate::error::ModelError;
use crate::header::Header;
use crate::params::{CommonParams, GeneralParams, TypeParams};
use crate::source::SourceModel;

/// Capability set of an object-type parameter model.
pub trait ObjectParameterModel {
    /// Settings needed to build the model.
    type Config;

    /// Builds the model and its source handle, validating the configuration.
    ///
    /// Fails when the source model is unsupported, cannot provide a flux
    /// covariance, or a required setting is invalid.
    fn init_model(config: Self::Config) -> Result<Self, ModelError>
    where
        Self: Sized;

    /// Object type label written to headers, e.g. `"SNIa"`.
    fn object_type(&self) -> &'static str;

    /// Light-curve source handle.
    fn source(&self) -> &SourceModel;

    /// Model-wide parameters.
    fn general_params(&self) -> &GeneralParams;

    /// Recomputes the model-wide parameters from the configuration.
    fn update_general_params(&mut self) -> Result<(), ModelError>;

    /// Draws type-specific parameters for `n` objects.
    ///
    /// `common` carries the already-drawn redshifts and positions; `rng` is
    /// the generator dedicated to type parameters.
    fn generate_type_params(
        &self,
        n: usize,
        common: &CommonParams<'_>,
        rng: &mut SimRng,
    ) -> Result<TypeParams, ModelError>;

    /// Adds type-specific settings to a run header.
    fn update_header(&self, header: &mut Header);
}

/// Supported object types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Type Ia supernova
    TypeIa,
}

impl ObjectKind {
    /// Names accepted by [`ObjectKind::parse`].
    pub const SUPPORTED: &'static [&'static str] = &["snia"];

    /// Parses an object type name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`ObjectKind::SUPPORTED`].
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match name.to_ascii_lowercase().as_str() {
            "snia" => Ok(ObjectKind::TypeIa),
            _ => Err(ModelError::Unsupported {
                kind: "object type",
                name: name.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

/// Configuration of one object-model variant.
#[derive(Clone, Debug)]
pub enum ObjectModelConfig {
    /// Type Ia supernova settings
    TypeIa(SnIaConfig),
}

/// Static dispatch enum over object types.
#[derive(Clone, Debug)]
pub enum ObjectModel {
    /// Type Ia supernova model
    TypeIa(SnIaModel),
}

impl ObjectModel {
    /// Object kind of this model.
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectModel::TypeIa(_) => ObjectKind::TypeIa,
        }
    }
}

impl ObjectParameterModel for ObjectModel {
    type Config = ObjectModelConfig;

    fn init_model(config: ObjectModelConfig) -> Result<Self, ModelError> {
        match config {
            ObjectModelConfig::TypeIa(c) => Ok(ObjectModel::TypeIa(SnIaModel::init_model(c)?)),
        }
    }

    fn object_type(&self) -> &'static str {
        match self {
            ObjectModel::TypeIa(m) => m.object_type(),
        }
    }

    fn source(&self) -> &SourceModel {
        match self {
            ObjectModel::TypeIa(m) => m.source(),
        }
    }

    fn general_params(&self) -> &GeneralParams {
        match self {
            ObjectModel::TypeIa(m) => m.general_params(),
        }
    }

    fn update_general_params(&mut self) -> Result<(), ModelError> {
        match self {
            ObjectModel::TypeIa(m) => m.update_general_params(),
        }
    }

    fn generate_type_params(
        &self,
        n: usize,
        common: &CommonParams<'_>,
        rng: &mut SimRng,
    ) -> Result<TypeParams, ModelError> {
        match self {
            ObjectModel::TypeIa(m) => m.generate_type_params(n, common, rng),
        }
    }

    fn update_header(&self, header: &mut Header) {
        match self {
            ObjectModel::TypeIa(m) => m.update_header(header),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_kind_parse() {
        assert_eq!(ObjectKind::parse("SNIa").unwrap(), ObjectKind::TypeIa);
        assert!(matches!(
            ObjectKind::parse("snII"),
            Err(ModelError::Unsupported { kind: "object type", .. })
        ));
    }
}
