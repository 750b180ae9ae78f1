//! Light-curve source handle.
//!
//! Flux synthesis happens outside this workspace. What the population
//! generator needs from a source model is the handle: which parameters it
//! exposes, which optional effects (Milky Way dust, wavelength-dependent
//! scatter) are attached, whether it can provide a flux covariance, and the
//! rest-frame phase range over which it is valid.

use std::path::{Path, PathBuf};

use crate::error::ModelError;

/// Supported light-curve source families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// SALT2 spectral time-series model
    Salt2,
    /// SALT3 spectral time-series model
    Salt3,
}

impl SourceKind {
    /// Names accepted by [`SourceKind::parse`].
    pub const SUPPORTED: &'static [&'static str] = &["salt2", "salt3"];

    /// Parses a model name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`SourceKind::SUPPORTED`].
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match name.to_ascii_lowercase().as_str() {
            "salt2" => Ok(SourceKind::Salt2),
            "salt3" => Ok(SourceKind::Salt3),
            _ => Err(ModelError::Unsupported {
                kind: "source model",
                name: name.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }

    /// Canonical lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Salt2 => "salt2",
            SourceKind::Salt3 => "salt3",
        }
    }

    /// Core parameters with their default values.
    fn default_params(&self) -> [(&'static str, f64); 5] {
        match self {
            SourceKind::Salt2 | SourceKind::Salt3 => {
                [("z", 0.0), ("t0", 0.0), ("x0", 1.0), ("x1", 0.0), ("c", 0.0)]
            }
        }
    }

    /// Rest-frame phase range in days relative to peak.
    fn phase_range(&self) -> (f64, f64) {
        match self {
            SourceKind::Salt2 | SourceKind::Salt3 => (-20.0, 50.0),
        }
    }

    fn has_flux_covariance(&self) -> bool {
        match self {
            SourceKind::Salt2 | SourceKind::Salt3 => true,
        }
    }
}

/// A named group of extra parameters attached to a source.
///
/// Parameter names are stored without the prefix; the source exposes them
/// as `prefix + name` (e.g. `mw_` + `ebv`).
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    prefix: String,
    params: Vec<(String, f64)>,
}

impl Effect {
    /// Creates an effect with default parameter values.
    pub fn new(prefix: impl Into<String>, params: &[(&str, f64)]) -> Self {
        Self {
            prefix: prefix.into(),
            params: params.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        }
    }

    /// Effect prefix, e.g. `"G10_"`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Handle on a light-curve source model.
///
/// # Example
///
/// ```
/// use popsim_models::source::{Effect, SourceModel};
///
/// let mut model = SourceModel::from_name("SALT2", None).unwrap();
/// model.add_effect(Effect::new("mw_", &[("ebv", 0.0), ("r_v", 3.1)]));
///
/// assert_eq!(model.name(), "salt2");
/// assert!(model.has_effect("mw_"));
/// assert_eq!(model.get("mw_r_v"), Some(3.1));
///
/// model.set("x1", 0.5).unwrap();
/// assert_eq!(model.get("x1"), Some(0.5));
/// assert!(model.set("unknown", 1.0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SourceModel {
    kind: SourceKind,
    dir: Option<PathBuf>,
    params: Vec<(String, f64)>,
    effects: Vec<Effect>,
}

impl SourceModel {
    /// Creates a handle for a known source family.
    pub fn new(kind: SourceKind, dir: Option<PathBuf>) -> Self {
        Self {
            kind,
            dir,
            params: kind
                .default_params()
                .iter()
                .map(|(n, v)| (n.to_string(), *v))
                .collect(),
            effects: Vec::new(),
        }
    }

    /// Creates a handle from a configuration model name.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] when the name is not a known source.
    pub fn from_name(name: &str, dir: Option<PathBuf>) -> Result<Self, ModelError> {
        Ok(Self::new(SourceKind::parse(name)?, dir))
    }

    /// Source family.
    #[inline]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Canonical source name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Directory the model files are read from, if not the built-in ones.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Whether the source can provide a flux covariance.
    #[inline]
    pub fn has_flux_covariance(&self) -> bool {
        self.kind.has_flux_covariance()
    }

    /// Attaches an effect, replacing any effect with the same prefix.
    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.retain(|e| e.prefix != effect.prefix);
        self.effects.push(effect);
    }

    /// Prefixes of the attached effects, in attachment order.
    pub fn effect_names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.prefix.as_str()).collect()
    }

    /// Returns true when an effect with `prefix` is attached.
    pub fn has_effect(&self, prefix: &str) -> bool {
        self.effects.iter().any(|e| e.prefix == prefix)
    }

    /// All parameter names: core parameters first, then effect parameters.
    pub fn param_names(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|(n, _)| n.clone())
            .chain(
                self.effects
                    .iter()
                    .flat_map(|e| e.params.iter().map(move |(n, _)| format!("{}{}", e.prefix, n))),
            )
            .collect()
    }

    /// Current value of a parameter.
    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some((_, v)) = self.params.iter().find(|(n, _)| n == name) {
            return Some(*v);
        }
        self.effects.iter().find_map(|e| {
            let rest = name.strip_prefix(e.prefix.as_str())?;
            e.params.iter().find(|(n, _)| n == rest).map(|(_, v)| *v)
        })
    }

    /// Sets a parameter value.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownParameter`] if the source exposes no such name.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        if let Some(slot) = self.params.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
            return Ok(());
        }
        for effect in &mut self.effects {
            if let Some(rest) = name.strip_prefix(effect.prefix.as_str()) {
                if let Some(slot) = effect.params.iter_mut().find(|(n, _)| n == rest) {
                    slot.1 = value;
                    return Ok(());
                }
            }
        }
        Err(ModelError::UnknownParameter {
            model: self.name().to_string(),
            name: name.to_string(),
        })
    }

    /// Observer-frame validity window relative to peak for redshift `z`.
    pub fn time_bounds(&self, z: f64) -> (f64, f64) {
        let (lo, hi) = self.kind.phase_range();
        (lo * (1.0 + z), hi * (1.0 + z))
    }

    /// Rest-frame validity window relative to peak.
    pub fn rest_frame_bounds(&self) -> (f64, f64) {
        self.kind.phase_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(SourceKind::parse("SALT3").unwrap(), SourceKind::Salt3);
        assert_eq!(SourceKind::parse("salt2").unwrap(), SourceKind::Salt2);
    }

    #[test]
    fn test_unknown_source_lists_supported() {
        match SourceKind::parse("hsiao") {
            Err(ModelError::Unsupported { supported, name, .. }) => {
                assert_eq!(supported, SourceKind::SUPPORTED);
                assert_eq!(name, "hsiao");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_param_names_include_effects() {
        let mut model = SourceModel::new(SourceKind::Salt2, None);
        model.add_effect(Effect::new("G10_", &[("L0", 2157.3), ("RndS", 0.0)]));
        let names = model.param_names();
        assert_eq!(&names[..5], &["z", "t0", "x0", "x1", "c"]);
        assert_eq!(&names[5..], &["G10_L0", "G10_RndS"]);
        assert_eq!(model.effect_names(), vec!["G10_"]);
    }

    #[test]
    fn test_effect_replacement() {
        let mut model = SourceModel::new(SourceKind::Salt3, Some(PathBuf::from("/models/salt3")));
        model.add_effect(Effect::new("mw_", &[("ebv", 0.0), ("r_v", 3.1)]));
        model.add_effect(Effect::new("mw_", &[("ebv", 0.0)]));
        assert_eq!(model.effect_names().len(), 1);
        assert_eq!(model.get("mw_r_v"), None);
        assert_eq!(model.dir(), Some(Path::new("/models/salt3")));
    }

    #[test]
    fn test_set_effect_parameter() {
        let mut model = SourceModel::new(SourceKind::Salt2, None);
        model.add_effect(Effect::new("C11_", &[("Cuu", 0.0), ("Sc", 1.3)]));
        model.set("C11_Sc", 1.1).unwrap();
        assert_eq!(model.get("C11_Sc"), Some(1.1));
        assert!(model.set("C11_Cxx", 0.0).is_err());
    }

    #[test]
    fn test_time_bounds_stretch_with_redshift() {
        let model = SourceModel::new(SourceKind::Salt2, None);
        assert_eq!(model.rest_frame_bounds(), (-20.0, 50.0));
        let (lo, hi) = model.time_bounds(1.0);
        assert_eq!(lo, -40.0);
        assert_eq!(hi, 100.0);
        assert!(model.has_flux_covariance());
    }
}
