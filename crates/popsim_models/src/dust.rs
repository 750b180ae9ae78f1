//! Milky Way dust extinction laws.
//!
//! The extinction itself is computed by the light-curve synthesis; here we
//! only pick the law, attach the matching `mw_` effect to the source and
//! produce the per-object parameters it needs.

use crate::error::ModelError;
use crate::source::{Effect, SourceModel};

/// Prefix of the Milky Way dust effect on a source model.
pub const MW_PREFIX: &str = "mw_";

/// Total-to-selective extinction ratio used when none is configured.
pub const DEFAULT_R_V: f64 = 3.1;

/// Supported extinction laws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum DustLaw {
    /// Cardelli, Clayton & Mathis (1989)
    Ccm89,
    /// O'Donnell (1994)
    Od94,
    /// Fitzpatrick (1999), fixed R_V
    F99,
}

impl DustLaw {
    /// Names accepted by [`DustLaw::parse`].
    pub const SUPPORTED: &'static [&'static str] = &["CCM89", "OD94", "F99"];

    /// Parses a law name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`DustLaw::SUPPORTED`].
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match name.to_ascii_lowercase().as_str() {
            "ccm89" => Ok(DustLaw::Ccm89),
            "od94" => Ok(DustLaw::Od94),
            "f99" => Ok(DustLaw::F99),
            _ => Err(ModelError::Unsupported {
                kind: "dust law",
                name: name.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            DustLaw::Ccm89 => "CCM89",
            DustLaw::Od94 => "OD94",
            DustLaw::F99 => "F99",
        }
    }

    /// Whether each object carries its own R_V parameter.
    pub fn uses_r_v(&self) -> bool {
        matches!(self, DustLaw::Ccm89 | DustLaw::Od94)
    }
}

impl TryFrom<String> for DustLaw {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DustLaw::parse(&value)
    }
}

impl From<DustLaw> for String {
    fn from(law: DustLaw) -> Self {
        law.name().to_string()
    }
}

/// Configured Milky Way dust: the law and its R_V.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DustSettings {
    /// Extinction law
    pub law: DustLaw,
    /// Total-to-selective extinction ratio
    pub r_v: f64,
}

impl DustSettings {
    /// Creates settings, defaulting R_V to [`DEFAULT_R_V`].
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidParameter`] for a non-positive R_V.
    pub fn new(law: DustLaw, r_v: Option<f64>) -> Result<Self, ModelError> {
        let r_v = r_v.unwrap_or(DEFAULT_R_V);
        if !(r_v.is_finite() && r_v > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "Rv",
                value: r_v,
                reason: "must be positive and finite",
            });
        }
        Ok(Self { law, r_v })
    }

    /// Attaches the `mw_` effect for this law to `source`.
    pub fn attach(&self, source: &mut SourceModel) {
        let effect = if self.law.uses_r_v() {
            Effect::new(MW_PREFIX, &[("ebv", 0.0), ("r_v", self.r_v)])
        } else {
            Effect::new(MW_PREFIX, &[("ebv", 0.0)])
        };
        source.add_effect(effect);
    }

    /// Per-object dust parameters for a colour excess `ebv`.
    ///
    /// ```
    /// use popsim_models::dust::{DustLaw, DustSettings};
    ///
    /// let ccm = DustSettings::new(DustLaw::Ccm89, None).unwrap();
    /// assert_eq!(ccm.object_params(0.05), vec![("mw_r_v", 3.1), ("mw_ebv", 0.05)]);
    ///
    /// let f99 = DustSettings::new(DustLaw::F99, Some(2.0)).unwrap();
    /// assert_eq!(f99.object_params(0.05), vec![("mw_ebv", 0.05)]);
    /// ```
    pub fn object_params(&self, ebv: f64) -> Vec<(&'static str, f64)> {
        if self.law.uses_r_v() {
            vec![("mw_r_v", self.r_v), ("mw_ebv", ebv)]
        } else {
            vec![("mw_ebv", ebv)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn test_parse_names() {
        assert_eq!(DustLaw::parse("ccm89").unwrap(), DustLaw::Ccm89);
        assert_eq!(DustLaw::parse("OD94").unwrap(), DustLaw::Od94);
        assert_eq!(DustLaw::parse("f99").unwrap(), DustLaw::F99);
        assert!(matches!(
            DustLaw::parse("fm07"),
            Err(ModelError::Unsupported { kind: "dust law", .. })
        ));
    }

    #[test]
    fn test_default_r_v() {
        let settings = DustSettings::new(DustLaw::Od94, None).unwrap();
        assert_eq!(settings.r_v, DEFAULT_R_V);
        assert!(DustSettings::new(DustLaw::Od94, Some(-1.0)).is_err());
    }

    #[test]
    fn test_attach_adds_mw_effect() {
        let mut source = SourceModel::new(SourceKind::Salt2, None);
        DustSettings::new(DustLaw::Ccm89, Some(2.5))
            .unwrap()
            .attach(&mut source);
        assert!(source.has_effect(MW_PREFIX));
        assert_eq!(source.get("mw_r_v"), Some(2.5));
        assert_eq!(source.get("mw_ebv"), Some(0.0));
    }

    #[test]
    fn test_f99_has_no_r_v() {
        let mut source = SourceModel::new(SourceKind::Salt2, None);
        DustSettings::new(DustLaw::F99, None).unwrap().attach(&mut source);
        assert_eq!(source.get("mw_r_v"), None);
        assert!(!DustLaw::F99.uses_r_v());
    }
}
