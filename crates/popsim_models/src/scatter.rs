//! Wavelength-dependent intrinsic scatter models.
//!
//! A scatter model is an effect on the source with a few fixed parameters
//! plus a per-object random seed (`RndS`) that the synthesis side uses to
//! draw the actual colour perturbation.

use crate::error::ModelError;
use crate::header::Header;
use crate::source::{Effect, SourceModel};

/// Lower bound (inclusive) of per-object scatter seeds.
pub const RNDS_LOW: u64 = 1_000;

/// Upper bound (exclusive) of per-object scatter seeds.
pub const RNDS_HIGH: u64 = 100_000;

/// Supported scatter models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ScatterModel {
    /// Guy et al. (2010)
    G10,
    /// Chotard et al. (2011)
    C11,
}

impl ScatterModel {
    /// Names accepted by [`ScatterModel::parse`].
    pub const SUPPORTED: &'static [&'static str] = &["G10", "C11"];

    /// Parses a model name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`ScatterModel::SUPPORTED`].
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match name.to_ascii_lowercase().as_str() {
            "g10" => Ok(ScatterModel::G10),
            "c11" => Ok(ScatterModel::C11),
            _ => Err(ModelError::Unsupported {
                kind: "scatter model",
                name: name.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            ScatterModel::G10 => "G10",
            ScatterModel::C11 => "C11",
        }
    }

    /// Effect prefix on the source model.
    pub fn prefix(&self) -> &'static str {
        match self {
            ScatterModel::G10 => "G10_",
            ScatterModel::C11 => "C11_",
        }
    }

    /// Fixed model parameters and their defaults.
    pub fn default_params(&self) -> &'static [(&'static str, f64)] {
        match self {
            ScatterModel::G10 => &[("L0", 2157.3), ("F0", 0.0), ("F1", 1.08e-4), ("dL", 800.0)],
            ScatterModel::C11 => &[("Cuu", 0.0), ("Sc", 1.3)],
        }
    }

    /// Name of the per-object seed column, e.g. `"G10_RndS"`.
    pub fn seed_column(&self) -> String {
        format!("{}RndS", self.prefix())
    }

    /// Attaches the scatter effect to `source`.
    pub fn attach(&self, source: &mut SourceModel) {
        let mut params: Vec<(&str, f64)> = self.default_params().to_vec();
        params.push(("RndS", 0.0));
        source.add_effect(Effect::new(self.prefix(), &params));
    }

    /// Detects the scatter effect attached to a source, if any.
    pub fn from_source(source: &SourceModel) -> Option<Self> {
        [ScatterModel::G10, ScatterModel::C11]
            .into_iter()
            .find(|m| source.has_effect(m.prefix()))
    }

    /// Records the model name and its parameters as read back from `source`.
    pub fn update_header(&self, source: &SourceModel, header: &mut Header) {
        header.insert("sct_mod", self.name());
        for (name, _) in self.default_params() {
            let key = format!("{}{}", self.prefix(), name);
            if let Some(value) = source.get(&key) {
                header.insert(key, value);
            }
        }
    }
}

impl TryFrom<String> for ScatterModel {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ScatterModel::parse(&value)
    }
}

impl From<ScatterModel> for String {
    fn from(model: ScatterModel) -> Self {
        model.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn test_parse() {
        assert_eq!(ScatterModel::parse("g10").unwrap(), ScatterModel::G10);
        assert_eq!(ScatterModel::parse("C11").unwrap(), ScatterModel::C11);
        assert!(ScatterModel::parse("H21").is_err());
    }

    #[test]
    fn test_attach_and_detect() {
        let mut source = SourceModel::new(SourceKind::Salt2, None);
        assert_eq!(ScatterModel::from_source(&source), None);

        ScatterModel::G10.attach(&mut source);
        assert_eq!(ScatterModel::from_source(&source), Some(ScatterModel::G10));
        assert_eq!(source.get("G10_L0"), Some(2157.3));
        assert_eq!(source.get("G10_F1"), Some(1.08e-4));
        assert_eq!(source.get("G10_RndS"), Some(0.0));
    }

    #[test]
    fn test_header_reads_source_values() {
        let mut source = SourceModel::new(SourceKind::Salt3, None);
        ScatterModel::C11.attach(&mut source);
        source.set("C11_Sc", 1.1).unwrap();

        let mut header = Header::new();
        ScatterModel::C11.update_header(&source, &mut header);
        assert_eq!(header.get_f64("C11_Sc"), Some(1.1));
        assert_eq!(header.get_f64("C11_Cuu"), Some(0.0));
        assert!(!header.contains_key("C11_RndS"));
        assert_eq!(ScatterModel::C11.seed_column(), "C11_RndS");
    }
}
