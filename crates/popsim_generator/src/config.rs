//! Generator configuration document.
//!
//! Loaded from TOML and validated in a separate pass, so one read reports
//! every problem at once:
//!
//! ```toml
//! rate = 3e-5
//! rate_power = 0.0
//! redshift_range = [0.01, 0.1]
//! absolute_magnitude = "jla"
//!
//! [cosmology]
//! H0 = 70.0
//! Om0 = 0.3
//!
//! [model]
//! name = "salt2"
//!
//! [shape_param_distributions]
//! x1 = [0.0, 1.0]
//! c = [-0.077, 0.029, 0.121]
//! ```
//!
//! Unknown keys are ignored so the document can share a file with other
//! tables (the CLI keeps its `[run]` table there).

use std::path::{Path, PathBuf};

use popsim_core::constants::{B_CMB_DEG, DEFAULT_RATE, L_CMB_DEG, V_CMB};
use popsim_core::cosmology::LambdaCdm;
use popsim_core::sky::Footprint;
use popsim_models::distributions::ShapeDistribution;
use popsim_models::dust::{DustLaw, DustSettings};
use popsim_models::magnitude::AbsoluteMagnitude;
use popsim_models::object::{ObjectKind, ObjectModelConfig, SnIaConfig};
use popsim_models::scatter::ScatterModel;
use serde::Deserialize;

use crate::dipole::MagnitudeDipole;
use crate::error::GeneratorError;
use crate::frame::FrameCorrector;
use crate::rate::RateLaw;
use crate::sky::SkySampler;

/// Rate setting: a value in objects · Mpc⁻³ · yr⁻¹ or a named recipe.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RateSpec {
    /// Rate at z = 0
    Value(f64),
    /// Named recipe, e.g. `"ptf19"`
    Recipe(String),
}

impl Default for RateSpec {
    fn default() -> Self {
        RateSpec::Value(DEFAULT_RATE)
    }
}

impl RateSpec {
    /// Recipe names.
    pub const RECIPES: &'static [&'static str] = &["ptf19"];

    /// Resolves the rate law for a cosmology with Hubble constant `h0`.
    ///
    /// Recipes fix their own redshift dependence, so `power` only applies to
    /// literal values.
    pub fn resolve(&self, power: f64, h0: f64) -> Result<RateLaw, GeneratorError> {
        match self {
            RateSpec::Value(rate) => RateLaw::new(*rate, power),
            RateSpec::Recipe(name) if name.eq_ignore_ascii_case("ptf19") => RateLaw::ptf19(h0),
            RateSpec::Recipe(name) => Err(GeneratorError::Unsupported {
                kind: "rate recipe",
                name: name.clone(),
                supported: Self::RECIPES,
            }),
        }
    }
}

/// Cosmological parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CosmologyConfig {
    /// Hubble constant in km/s/Mpc
    #[serde(rename = "H0")]
    pub h0: f64,
    /// Matter density
    #[serde(rename = "Om0")]
    pub om0: f64,
    /// Dark-energy density; derived from `Om0` and `Ok0` when absent
    #[serde(rename = "Ode0")]
    pub ode0: Option<f64>,
    /// Curvature density, zero when absent
    #[serde(rename = "Ok0")]
    pub ok0: Option<f64>,
    /// Dark-energy equation of state today
    #[serde(default = "default_w0")]
    pub w0: f64,
    /// Dark-energy equation of state evolution
    #[serde(default)]
    pub wa: f64,
}

fn default_w0() -> f64 {
    -1.0
}

impl CosmologyConfig {
    /// Builds the cosmology and checks it expands up to `z_max`.
    pub fn build(&self, z_max: f64) -> Result<LambdaCdm, GeneratorError> {
        let ode0 = match (self.ode0, self.ok0) {
            (Some(_), Some(_)) => {
                return Err(GeneratorError::MutuallyExclusive {
                    first: "cosmology.Ode0",
                    second: "cosmology.Ok0",
                })
            }
            (Some(ode0), None) => ode0,
            (None, ok0) => 1.0 - self.om0 - ok0.unwrap_or(0.0),
        };
        let cosmology = LambdaCdm::new(self.h0, self.om0, ode0)?.with_dark_energy(self.w0, self.wa);
        cosmology.check_expansion(z_max)?;
        Ok(cosmology)
    }
}

/// CMB dipole used for the frame correction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CmbConfig {
    /// Dipole speed in km/s
    #[serde(default = "default_v_cmb")]
    pub v_cmb: f64,
    /// Apex galactic longitude in degrees
    #[serde(default = "default_l_cmb")]
    pub l_cmb: f64,
    /// Apex galactic latitude in degrees
    #[serde(default = "default_b_cmb")]
    pub b_cmb: f64,
}

fn default_v_cmb() -> f64 {
    V_CMB
}

fn default_l_cmb() -> f64 {
    L_CMB_DEG
}

fn default_b_cmb() -> f64 {
    B_CMB_DEG
}

impl Default for CmbConfig {
    fn default() -> Self {
        Self {
            v_cmb: V_CMB,
            l_cmb: L_CMB_DEG,
            b_cmb: B_CMB_DEG,
        }
    }
}

/// Light-curve source model selection.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModelConfig {
    /// Source model name
    pub name: String,
    /// Directory with the model files
    pub dir: Option<PathBuf>,
    /// Stretch coefficient
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Colour coefficient
    #[serde(default = "default_beta")]
    pub beta: f64,
}

fn default_alpha() -> f64 {
    0.14
}

fn default_beta() -> f64 {
    3.1
}

/// Stretch and colour distributions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ShapeParamConfig {
    /// Stretch
    pub x1: ShapeDistribution,
    /// Colour
    pub c: ShapeDistribution,
}

/// Gaussian peculiar velocities in km/s.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct VelocityConfig {
    /// Mean
    #[serde(default)]
    pub mean: f64,
    /// Standard deviation
    pub sigma: f64,
}

/// Milky Way dust.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct DustConfig {
    /// Extinction law
    pub model: DustLaw,
    /// R_V for laws that use it
    #[serde(rename = "Rv")]
    pub r_v: Option<f64>,
}

/// Magnitude dipole.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct DipoleConfig {
    /// Axis `[ra, dec]` in degrees
    pub axis_coords: [f64; 2],
    /// Monopole term
    #[serde(rename = "A")]
    pub a: f64,
    /// Dipole amplitude
    #[serde(rename = "B")]
    pub b: f64,
}

/// Survey footprint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FootprintConfig {
    /// Polygon vertices `[ra, dec]` in radians
    pub vertices: Vec<[f64; 2]>,
    /// Cap on consecutive rejected candidates
    pub max_trials: usize,
}

/// Complete generator configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    /// Object type name
    #[serde(default = "default_object_type")]
    pub object_type: String,
    /// Volumetric rate at z = 0 or a recipe name
    #[serde(default)]
    pub rate: RateSpec,
    /// Rate power-law index in `(1+z)`
    #[serde(default)]
    pub rate_power: f64,
    /// `[z_min, z_max]`
    pub redshift_range: [f64; 2],
    /// Cosmology
    pub cosmology: CosmologyConfig,
    /// CMB dipole; the standard values when absent
    #[serde(default)]
    pub cmb: CmbConfig,
    /// Source model
    pub model: ModelConfig,
    /// Absolute magnitude value or recipe
    pub absolute_magnitude: AbsoluteMagnitude,
    /// Stretch and colour distributions
    pub shape_param_distributions: ShapeParamConfig,
    /// Coherent magnitude scatter width
    #[serde(default)]
    pub coherent_scatter_sigma: f64,
    /// Wavelength-dependent scatter model
    pub scatter_model: Option<ScatterModel>,
    /// Whether synthesis uses the model flux covariance
    #[serde(default)]
    pub flux_covariance: bool,
    /// Peculiar velocity distribution
    pub peculiar_velocity: Option<VelocityConfig>,
    /// Milky Way dust
    pub dust: Option<DustConfig>,
    /// Magnitude dipole
    pub dipole: Option<DipoleConfig>,
    /// Survey footprint
    pub footprint: Option<FootprintConfig>,
    /// Root seed used when a request carries none
    pub root_seed: Option<u64>,
}

fn default_object_type() -> String {
    "snia".to_string()
}

impl GeneratorConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, GeneratorError> {
        toml::from_str(content).map_err(|e| GeneratorError::Parse(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load_and_validate(path: &Path) -> Result<Self, GeneratorError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Lower redshift bound.
    #[inline]
    pub fn z_min(&self) -> f64 {
        self.redshift_range[0]
    }

    /// Upper redshift bound.
    #[inline]
    pub fn z_max(&self) -> f64 {
        self.redshift_range[1]
    }

    /// Checks values that parsing alone cannot.
    ///
    /// Scalar range problems are collected and reported together as one
    /// [`GeneratorError::Config`]; an invalid redshift range or an unknown
    /// object type is reported on its own.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let (z_min, z_max) = (self.z_min(), self.z_max());
        if !(z_min.is_finite() && z_max.is_finite() && z_min >= 0.0 && z_min < z_max) {
            return Err(GeneratorError::InvalidRedshiftRange { z_min, z_max });
        }
        ObjectKind::parse(&self.object_type)?;

        let mut errors = Vec::new();

        if !self.rate_power.is_finite() {
            errors.push(format!("rate_power must be finite, got {}", self.rate_power));
        }
        if let RateSpec::Value(rate) = self.rate {
            if !(rate.is_finite() && rate >= 0.0) {
                errors.push(format!("rate must be non-negative, got {}", rate));
            }
        }
        if !(self.coherent_scatter_sigma.is_finite() && self.coherent_scatter_sigma >= 0.0) {
            errors.push(format!(
                "coherent_scatter_sigma must be non-negative, got {}",
                self.coherent_scatter_sigma
            ));
        }
        if !(self.cmb.v_cmb.is_finite() && self.cmb.v_cmb >= 0.0) {
            errors.push(format!("cmb.v_cmb must be non-negative, got {}", self.cmb.v_cmb));
        }
        if let Some(vpec) = &self.peculiar_velocity {
            if !(vpec.mean.is_finite() && vpec.sigma.is_finite() && vpec.sigma >= 0.0) {
                errors.push(format!(
                    "peculiar_velocity needs a finite mean and non-negative sigma, got ({}, {})",
                    vpec.mean, vpec.sigma
                ));
            }
        }
        if let Some(footprint) = &self.footprint {
            if footprint.max_trials == 0 {
                errors.push("footprint.max_trials must be greater than 0".to_string());
            }
            if footprint.vertices.len() < 3 {
                errors.push(format!(
                    "footprint needs at least 3 vertices, got {}",
                    footprint.vertices.len()
                ));
            }
        }
        if let Some(dipole) = &self.dipole {
            if !(-90.0..=90.0).contains(&dipole.axis_coords[1]) {
                errors.push(format!(
                    "dipole declination {} is outside [-90, 90]",
                    dipole.axis_coords[1]
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GeneratorError::Config(errors.join("; ")))
        }
    }

    /// Rate law for the configured cosmology.
    pub fn rate_law(&self) -> Result<RateLaw, GeneratorError> {
        self.rate.resolve(self.rate_power, self.cosmology.h0)
    }

    /// Cosmology, checked to expand over the redshift range.
    pub fn build_cosmology(&self) -> Result<LambdaCdm, GeneratorError> {
        self.cosmology.build(self.z_max())
    }

    /// Dust settings.
    pub fn dust_settings(&self) -> Result<Option<DustSettings>, GeneratorError> {
        self.dust
            .map(|d| DustSettings::new(d.model, d.r_v))
            .transpose()
            .map_err(GeneratorError::from)
    }

    /// Settings for the object model.
    pub fn object_model_config(&self, h0: f64) -> Result<ObjectModelConfig, GeneratorError> {
        match ObjectKind::parse(&self.object_type)? {
            ObjectKind::TypeIa => {
                let mut config = SnIaConfig::new(
                    self.model.name.clone(),
                    h0,
                    self.absolute_magnitude.clone(),
                    self.shape_param_distributions.x1.clone(),
                    self.shape_param_distributions.c.clone(),
                )
                .with_coefficients(self.model.alpha, self.model.beta)
                .with_coherent_scatter(self.coherent_scatter_sigma);
                config.model_dir = self.model.dir.clone();
                config.flux_covariance = self.flux_covariance;
                if let Some(scatter) = self.scatter_model {
                    config = config.with_scatter_model(scatter);
                }
                if let Some(dust) = self.dust_settings()? {
                    config = config.with_dust(dust);
                }
                Ok(ObjectModelConfig::TypeIa(config))
            }
        }
    }

    /// Heliocentric to CMB frame corrector.
    pub fn frame_corrector(&self) -> FrameCorrector {
        FrameCorrector::new(self.cmb.v_cmb, self.cmb.l_cmb, self.cmb.b_cmb)
    }

    /// Sky sampler, restricted to the footprint when one is configured.
    pub fn sky_sampler(&self) -> Result<SkySampler, GeneratorError> {
        match &self.footprint {
            None => Ok(SkySampler::full_sky()),
            Some(fp) => {
                let footprint = Footprint::try_from(fp.vertices.clone())?;
                Ok(SkySampler::with_footprint(footprint, fp.max_trials))
            }
        }
    }

    /// Magnitude dipole, when configured.
    pub fn magnitude_dipole(&self) -> Result<Option<MagnitudeDipole>, GeneratorError> {
        self.dipole
            .map(|d| MagnitudeDipole::new(d.axis_coords[0], d.axis_coords[1], d.a, d.b))
            .transpose()
    }
}
