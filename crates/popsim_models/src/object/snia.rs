//! Type Ia supernova parameter model (SALT2/SALT3 sources).

use std::collections::BTreeMap;
use std::path::PathBuf;

use popsim_core::rng::{SeedDeriver, SimRng, SEED_HIGH, SEED_LOW};
use tracing::debug;

use super::ObjectParameterModel;
use crate::distributions::{N21Stretch, ShapeDistribution};
use crate::dust::DustSettings;
use crate::error::ModelError;
use crate::header::Header;
use crate::magnitude::AbsoluteMagnitude;
use crate::params::{CommonParams, GeneralParams, TypeParams};
use crate::scatter::{ScatterModel, RNDS_HIGH, RNDS_LOW};
use crate::source::SourceModel;

/// Accepted shapes for the colour distribution.
const COLOUR_DISTRIBUTIONS: &[&str] = &["[mean, sigma]", "[mean, sigma_low, sigma_high]"];

/// Type Ia model settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SnIaConfig {
    /// Source model name (`salt2` or `salt3`)
    pub model_name: String,
    /// Directory holding the source model files
    pub model_dir: Option<PathBuf>,
    /// Hubble constant of the adopted cosmology, in km/s/Mpc
    pub h0: f64,
    /// Stretch coefficient
    pub alpha: f64,
    /// Colour coefficient
    pub beta: f64,
    /// Absolute magnitude setting
    pub absolute_magnitude: AbsoluteMagnitude,
    /// Width of the coherent magnitude scatter
    pub coherent_scatter_sigma: f64,
    /// Stretch distribution
    pub x1: ShapeDistribution,
    /// Colour distribution
    pub c: ShapeDistribution,
    /// Optional wavelength-dependent scatter model
    pub scatter_model: Option<ScatterModel>,
    /// Whether downstream synthesis uses the model flux covariance
    pub flux_covariance: bool,
    /// Optional Milky Way dust
    pub dust: Option<DustSettings>,
}

impl SnIaConfig {
    /// Creates settings with `alpha = 0.14`, `beta = 3.1`, no coherent
    /// scatter, no scatter model, no dust and flux covariance off.
    pub fn new(
        model_name: impl Into<String>,
        h0: f64,
        absolute_magnitude: AbsoluteMagnitude,
        x1: ShapeDistribution,
        c: ShapeDistribution,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            model_dir: None,
            h0,
            alpha: 0.14,
            beta: 3.1,
            absolute_magnitude,
            coherent_scatter_sigma: 0.0,
            x1,
            c,
            scatter_model: None,
            flux_covariance: false,
            dust: None,
        }
    }

    /// Sets the stretch and colour coefficients.
    pub fn with_coefficients(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the coherent magnitude scatter width.
    pub fn with_coherent_scatter(mut self, sigma: f64) -> Self {
        self.coherent_scatter_sigma = sigma;
        self
    }

    /// Sets the wavelength-dependent scatter model.
    pub fn with_scatter_model(mut self, model: ScatterModel) -> Self {
        self.scatter_model = Some(model);
        self
    }

    /// Sets Milky Way dust.
    pub fn with_dust(mut self, dust: DustSettings) -> Self {
        self.dust = Some(dust);
        self
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !(self.coherent_scatter_sigma.is_finite() && self.coherent_scatter_sigma >= 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "coherent_scatter_sigma",
                value: self.coherent_scatter_sigma,
                reason: "must be non-negative and finite",
            });
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() {
                return Err(ModelError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if self.c.is_redshift_dependent() {
            return Err(ModelError::Unsupported {
                kind: "colour distribution",
                name: "N21".to_string(),
                supported: COLOUR_DISTRIBUTIONS,
            });
        }
        Ok(())
    }
}

/// Type Ia supernova model.
///
/// Produces, per object, the coherent magnitude scatter `mag_sct`, the SALT
/// stretch `x1` and colour `c`, and the scatter-model seed column when a
/// scatter model is attached.
#[derive(Clone, Debug)]
pub struct SnIaModel {
    config: SnIaConfig,
    source: SourceModel,
    general: GeneralParams,
    n21: Option<N21Stretch>,
}

impl SnIaModel {
    /// Settings the model was built from.
    pub fn config(&self) -> &SnIaConfig {
        &self.config
    }

    fn stretch(
        &self,
        n: usize,
        common: &CommonParams<'_>,
        rng: &mut SimRng,
    ) -> Result<Vec<f64>, ModelError> {
        match (&self.n21, self.config.x1.sample(rng, n)) {
            (_, Some(x1)) => Ok(x1),
            (Some(table), None) => Ok(table.sample(rng, common.zcos)),
            (None, None) => Err(ModelError::InvalidDistribution {
                name: "x1".to_string(),
                reason: "redshift-dependent model has no table".to_string(),
            }),
        }
    }
}

impl ObjectParameterModel for SnIaModel {
    type Config = SnIaConfig;

    fn init_model(config: SnIaConfig) -> Result<Self, ModelError> {
        config.validate()?;

        let mut source = SourceModel::from_name(&config.model_name, config.model_dir.clone())?;
        if !source.has_flux_covariance() {
            return Err(ModelError::NoFluxCovariance(source.name().to_string()));
        }
        if let Some(scatter) = config.scatter_model {
            scatter.attach(&mut source);
        }
        if let Some(dust) = &config.dust {
            dust.attach(&mut source);
        }

        let n21 = if config.x1.is_redshift_dependent() {
            Some(N21Stretch::new()?)
        } else {
            None
        };

        debug!(
            model = source.name(),
            effects = ?source.effect_names(),
            "Initialised SNIa source model"
        );

        let mut model = Self {
            general: GeneralParams {
                m0: 0.0,
                sig_m: config.coherent_scatter_sigma,
                flux_covariance: config.flux_covariance,
                coefficients: BTreeMap::new(),
            },
            config,
            source,
            n21,
        };
        model.update_general_params()?;
        Ok(model)
    }

    fn object_type(&self) -> &'static str {
        "SNIa"
    }

    fn source(&self) -> &SourceModel {
        &self.source
    }

    fn general_params(&self) -> &GeneralParams {
        &self.general
    }

    fn update_general_params(&mut self) -> Result<(), ModelError> {
        self.general.m0 = self.config.absolute_magnitude.resolve(self.config.h0)?;
        self.general.sig_m = self.config.coherent_scatter_sigma;
        self.general.flux_covariance = self.config.flux_covariance;
        self.general.coefficients.insert("alpha".to_string(), self.config.alpha);
        self.general.coefficients.insert("beta".to_string(), self.config.beta);
        Ok(())
    }

    /// Draws `mag_sct`, `x1`, `c` and, with a scatter model, `<prefix>RndS`.
    ///
    /// One integer drawn from `rng` seeds a [`SeedDeriver`] whose first three
    /// sub-generators drive the coherent scatter, the stretch and the colour.
    /// Scatter-model seeds are then drawn from `rng` itself in
    /// `[1000, 100000)`.
    fn generate_type_params(
        &self,
        n: usize,
        common: &CommonParams<'_>,
        rng: &mut SimRng,
    ) -> Result<TypeParams, ModelError> {
        let mut seeds = SeedDeriver::new(rng.gen_integer(SEED_LOW, SEED_HIGH));
        let mut coherent_rng = seeds.next_rng();
        let mut x1_rng = seeds.next_rng();
        let mut c_rng = seeds.next_rng();

        let mut params = TypeParams::with_len(n);
        params.insert("mag_sct", coherent_rng.normal_vec(n, 0.0, self.general.sig_m))?;
        params.insert("x1", self.stretch(n, common, &mut x1_rng)?)?;

        let c = self
            .config
            .c
            .sample(&mut c_rng, n)
            .ok_or_else(|| ModelError::InvalidDistribution {
                name: "c".to_string(),
                reason: "colour cannot be redshift-dependent".to_string(),
            })?;
        params.insert("c", c)?;

        if let Some(scatter) = ScatterModel::from_source(&self.source) {
            let rnds = (0..n)
                .map(|_| rng.gen_integer(RNDS_LOW, RNDS_HIGH) as f64)
                .collect();
            params.insert(scatter.seed_column(), rnds)?;
        }

        Ok(params)
    }

    fn update_header(&self, header: &mut Header) {
        self.config.x1.update_header("x1", header);
        self.config.c.update_header("c", header);
        if let Some(scatter) = ScatterModel::from_source(&self.source) {
            scatter.update_header(&self.source, header);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dust::DustLaw;
    use approx::assert_relative_eq;

    fn config() -> SnIaConfig {
        SnIaConfig::new(
            "salt2",
            70.0,
            AbsoluteMagnitude::Value(-19.3),
            ShapeDistribution::from_values("x1", &[0.0, 1.0]).unwrap(),
            ShapeDistribution::from_values("c", &[0.0, 0.1]).unwrap(),
        )
    }

    fn common<'a>(z: &'a [f64], ra: &'a [f64], dec: &'a [f64]) -> CommonParams<'a> {
        CommonParams { zcos: z, ra, dec }
    }

    #[test]
    fn test_unsupported_model_name() {
        let mut cfg = config();
        cfg.model_name = "hsiao".to_string();
        assert!(matches!(
            SnIaModel::init_model(cfg),
            Err(ModelError::Unsupported { kind: "source model", .. })
        ));
    }

    #[test]
    fn test_general_params() {
        let model = SnIaModel::init_model(config().with_coefficients(0.15, 3.0).with_coherent_scatter(0.12)).unwrap();
        let general = model.general_params();
        assert_eq!(general.m0, -19.3);
        assert_eq!(general.sig_m, 0.12);
        assert_eq!(general.coefficients["alpha"], 0.15);
        assert_eq!(general.coefficients["beta"], 3.0);
        assert!(!general.flux_covariance);
    }

    #[test]
    fn test_jla_rescaled_with_h0() {
        let mut cfg = config();
        cfg.absolute_magnitude = AbsoluteMagnitude::Jla;
        cfg.h0 = 65.0;
        let model = SnIaModel::init_model(cfg).unwrap();
        let expected = -19.05 - 5.0 * (1.0_f64 + 5.0 / 65.0).log10();
        assert_relative_eq!(model.general_params().m0, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_n21_colour_rejected() {
        let mut cfg = config();
        cfg.c = ShapeDistribution::N21;
        assert!(matches!(
            SnIaModel::init_model(cfg),
            Err(ModelError::Unsupported { kind: "colour distribution", .. })
        ));
    }

    #[test]
    fn test_negative_scatter_rejected() {
        assert!(SnIaModel::init_model(config().with_coherent_scatter(-0.1)).is_err());
    }

    #[test]
    fn test_columns_and_zero_scatter() {
        let model = SnIaModel::init_model(config()).unwrap();
        let z = [0.05, 0.06, 0.07];
        let pos = [0.0; 3];
        let params = model
            .generate_type_params(3, &common(&z, &pos, &pos), &mut SimRng::from_seed(10))
            .unwrap();

        assert_eq!(params.names().collect::<Vec<_>>(), vec!["c", "mag_sct", "x1"]);
        assert!(params.column("mag_sct").unwrap().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_scatter_seeds() {
        let model = SnIaModel::init_model(config().with_scatter_model(ScatterModel::G10)).unwrap();
        let z = [0.1; 50];
        let pos = [0.0; 50];
        let params = model
            .generate_type_params(50, &common(&z, &pos, &pos), &mut SimRng::from_seed(11))
            .unwrap();

        let seeds = params.column("G10_RndS").unwrap();
        assert!(seeds
            .iter()
            .all(|&s| s.fract() == 0.0 && (1000.0..100_000.0).contains(&s)));
        assert!(params.column("C11_RndS").is_none());
    }

    #[test]
    fn test_scatter_seeds_do_not_shift_shape_params() {
        let plain = SnIaModel::init_model(config()).unwrap();
        let with_c11 = SnIaModel::init_model(config().with_scatter_model(ScatterModel::C11)).unwrap();
        let z = [0.1; 5];
        let pos = [0.0; 5];
        let c = common(&z, &pos, &pos);

        let a = plain.generate_type_params(5, &c, &mut SimRng::from_seed(12)).unwrap();
        let b = with_c11.generate_type_params(5, &c, &mut SimRng::from_seed(12)).unwrap();
        assert_eq!(a.column("x1"), b.column("x1"));
        assert_eq!(a.column("c"), b.column("c"));
    }

    #[test]
    fn test_n21_stretch_uses_redshift() {
        let mut cfg = config();
        cfg.x1 = ShapeDistribution::N21;
        let model = SnIaModel::init_model(cfg).unwrap();
        let z = [0.1, 0.5, 1.0, 1.5];
        let pos = [0.0; 4];
        let params = model
            .generate_type_params(4, &common(&z, &pos, &pos), &mut SimRng::from_seed(13))
            .unwrap();
        assert!(params.column("x1").unwrap().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_header() {
        let dust = DustSettings::new(DustLaw::Ccm89, None).unwrap();
        let model = SnIaModel::init_model(
            config()
                .with_scatter_model(ScatterModel::G10)
                .with_dust(dust),
        )
        .unwrap();
        let mut header = Header::new();
        model.update_header(&mut header);

        assert_eq!(header.get("dist_x1").map(|v| v.to_string()), Some("gauss".into()));
        assert_eq!(header.get("sct_mod").map(|v| v.to_string()), Some("G10".into()));
        assert_eq!(header.get_f64("G10_dL"), Some(800.0));
        assert!(model.source().has_effect("mw_"));
    }
}
