//! Absolute magnitude recipes.

use crate::error::ModelError;

/// Hubble constant the JLA calibration was derived with, in km/s/Mpc.
pub const H0_JLA: f64 = 70.0;

/// JLA absolute magnitude at [`H0_JLA`].
pub const M0_JLA: f64 = -19.05;

/// Rescales a reference absolute magnitude to another Hubble constant.
///
/// ```text
/// M0_new = M0_ref − 5·log10(1 + (H0_ref − H0_new) / H0_new)
/// ```
///
/// # Examples
///
/// ```
/// use popsim_models::magnitude::rescale_m0;
///
/// assert_eq!(rescale_m0(-19.05, 70.0, 70.0), -19.05);
/// assert!(rescale_m0(-19.05, 70.0, 65.0) < -19.05);
/// ```
#[inline]
pub fn rescale_m0(m0_ref: f64, h0_ref: f64, h0_new: f64) -> f64 {
    m0_ref - 5.0 * (1.0 + (h0_ref - h0_new) / h0_new).log10()
}

/// Absolute magnitude setting: a literal value or a named calibration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AbsoluteMagnitudeRepr", into = "AbsoluteMagnitudeRepr"))]
pub enum AbsoluteMagnitude {
    /// Used as given
    Value(f64),
    /// JLA calibration rescaled to the adopted H0
    Jla,
}

impl AbsoluteMagnitude {
    /// Recipe names accepted by [`AbsoluteMagnitude::parse`].
    pub const RECIPES: &'static [&'static str] = &["jla"];

    /// Parses a recipe name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`AbsoluteMagnitude::RECIPES`].
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        if name.eq_ignore_ascii_case("jla") {
            Ok(AbsoluteMagnitude::Jla)
        } else {
            Err(ModelError::Unsupported {
                kind: "absolute magnitude recipe",
                name: name.to_string(),
                supported: Self::RECIPES,
            })
        }
    }

    /// Resolves the magnitude for a cosmology with Hubble constant `h0`.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidParameter`] for a non-finite literal or a
    /// non-positive `h0` when rescaling.
    pub fn resolve(&self, h0: f64) -> Result<f64, ModelError> {
        match *self {
            AbsoluteMagnitude::Value(m0) if m0.is_finite() => Ok(m0),
            AbsoluteMagnitude::Value(m0) => Err(ModelError::InvalidParameter {
                name: "M0",
                value: m0,
                reason: "must be finite",
            }),
            AbsoluteMagnitude::Jla if h0.is_finite() && h0 > 0.0 => {
                Ok(rescale_m0(M0_JLA, H0_JLA, h0))
            }
            AbsoluteMagnitude::Jla => Err(ModelError::InvalidParameter {
                name: "H0",
                value: h0,
                reason: "must be positive to rescale M0",
            }),
        }
    }
}

/// Wire form: a number or a recipe name.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum AbsoluteMagnitudeRepr {
    Value(f64),
    Recipe(String),
}

#[cfg(feature = "serde")]
impl TryFrom<AbsoluteMagnitudeRepr> for AbsoluteMagnitude {
    type Error = ModelError;

    fn try_from(repr: AbsoluteMagnitudeRepr) -> Result<Self, Self::Error> {
        match repr {
            AbsoluteMagnitudeRepr::Value(v) => Ok(AbsoluteMagnitude::Value(v)),
            AbsoluteMagnitudeRepr::Recipe(name) => AbsoluteMagnitude::parse(&name),
        }
    }
}

#[cfg(feature = "serde")]
impl From<AbsoluteMagnitude> for AbsoluteMagnitudeRepr {
    fn from(m: AbsoluteMagnitude) -> Self {
        match m {
            AbsoluteMagnitude::Value(v) => AbsoluteMagnitudeRepr::Value(v),
            AbsoluteMagnitude::Jla => AbsoluteMagnitudeRepr::Recipe("jla".to_string()),
        }
    }
}
