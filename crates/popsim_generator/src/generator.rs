//! Population generator: composes the samplers into parameter records.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use popsim_core::constants::DAYS_PER_YEAR;
use popsim_core::cosmology::Cosmology;
use popsim_core::rng::SeedDeriver;
use popsim_models::dust::{DustSettings, MW_PREFIX};
use popsim_models::header::Header;
use popsim_models::object::{ObjectModel, ObjectParameterModel};
use popsim_models::params::CommonParams;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::collaborators::{DustMap, HostCatalog};
use crate::config::GeneratorConfig;
use crate::dipole::MagnitudeDipole;
use crate::error::GeneratorError;
use crate::frame::FrameCorrector;
use crate::rate::{RedshiftCdf, RedshiftRateModel};
use crate::record::{CommonColumns, ObjectParameterRecord, Population};
use crate::seeds::{SeedRole, SeedTable};
use crate::sky::SkySampler;

/// One generation call: how many objects, over which peak-time window and
/// from which root seed.
///
/// # Example
///
/// ```
/// use popsim_generator::PopulationRequest;
///
/// let request = PopulationRequest::new(100, (59_000.0, 59_365.0)).with_seed(42);
/// assert_eq!(request.root_seed(), Some(42));
/// assert!(request.validate().is_ok());
/// assert!(PopulationRequest::new(0, (0.0, 1.0)).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationRequest {
    count: usize,
    root_seed: Option<u64>,
    time_range: (f64, f64),
}

impl PopulationRequest {
    /// Request for `count` objects with peak times uniform in `time_range`.
    pub fn new(count: usize, time_range: (f64, f64)) -> Self {
        Self {
            count,
            root_seed: None,
            time_range,
        }
    }

    /// Fixes the root seed.
    pub fn with_seed(mut self, root_seed: u64) -> Self {
        self.root_seed = Some(root_seed);
        self
    }

    /// Number of objects.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Root seed, if fixed.
    #[inline]
    pub fn root_seed(&self) -> Option<u64> {
        self.root_seed
    }

    /// Peak-time window.
    #[inline]
    pub fn time_range(&self) -> (f64, f64) {
        self.time_range
    }

    /// Checks the count and time window.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.count == 0 {
            return Err(GeneratorError::InvalidRequest(
                "count must be greater than 0".to_string(),
            ));
        }
        let (t_min, t_max) = self.time_range;
        if !(t_min.is_finite() && t_max.is_finite() && t_min <= t_max) {
            return Err(GeneratorError::InvalidRequest(format!(
                "time range [{}, {}] must be finite and ordered",
                t_min, t_max
            )));
        }
        Ok(())
    }
}

/// Builder for [`PopulationGenerator`].
///
/// Collaborators are optional; [`build`](Self::build) checks that the
/// configuration and the supplied collaborators agree.
pub struct PopulationGeneratorBuilder {
    config: GeneratorConfig,
    cosmology: Option<Box<dyn Cosmology>>,
    host_catalog: Option<Arc<dyn HostCatalog>>,
    dust_map: Option<Arc<dyn DustMap>>,
    redshift_step: Option<f64>,
}

impl fmt::Debug for PopulationGeneratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationGeneratorBuilder")
            .field("config", &self.config)
            .field("cosmology", &self.cosmology.is_some())
            .field("host_catalog", &self.host_catalog.is_some())
            .field("dust_map", &self.dust_map.is_some())
            .field("redshift_step", &self.redshift_step)
            .finish()
    }
}

impl PopulationGeneratorBuilder {
    /// Replaces the cosmology built from the configuration.
    pub fn cosmology(mut self, cosmology: impl Cosmology + 'static) -> Self {
        self.cosmology = Some(Box::new(cosmology));
        self
    }

    /// Draws redshifts, positions and velocities from a host catalogue.
    pub fn host_catalog(mut self, catalog: Arc<dyn HostCatalog>) -> Self {
        self.host_catalog = Some(catalog);
        self
    }

    /// Supplies the reddening map used when dust is configured.
    pub fn dust_map(mut self, map: Arc<dyn DustMap>) -> Self {
        self.dust_map = Some(map);
        self
    }

    /// Overrides the redshift CDF grid step.
    pub fn redshift_step(mut self, step: f64) -> Self {
        self.redshift_step = Some(step);
        self
    }

    /// Validates the configuration, initialises the object model and builds
    /// the redshift CDF.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::MutuallyExclusive`] for a velocity distribution
    ///   together with a host catalogue
    /// - [`GeneratorError::MissingCollaborator`] for dust without a dust map
    /// - any configuration, model, cosmology or rate error
    pub fn build(self) -> Result<PopulationGenerator, GeneratorError> {
        let config = self.config;
        config.validate()?;

        if config.peculiar_velocity.is_some() && self.host_catalog.is_some() {
            return Err(GeneratorError::MutuallyExclusive {
                first: "peculiar_velocity",
                second: "host catalogue",
            });
        }

        let cosmology: Box<dyn Cosmology> = match self.cosmology {
            Some(c) => c,
            None => Box::new(config.build_cosmology()?),
        };
        let h0 = cosmology.h0();

        let model = ObjectModel::init_model(config.object_model_config(h0)?)?;
        let dust = config.dust_settings()?;
        if model.source().has_effect(MW_PREFIX) && self.dust_map.is_none() {
            return Err(GeneratorError::MissingCollaborator("dust map"));
        }

        let law = config.rate.resolve(config.rate_power, h0)?;
        let mut rate_model = RedshiftRateModel::new(law);
        if let Some(step) = self.redshift_step {
            rate_model = rate_model.with_step(step)?;
        }
        let start = Instant::now();
        let cdf = rate_model.build_cdf(config.z_min(), config.z_max(), cosmology.as_ref())?;
        debug!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            total_time_rate = cdf.total_time_rate(),
            "Redshift CDF ready"
        );

        let mut generator = PopulationGenerator {
            sky: config.sky_sampler()?,
            frame: config.frame_corrector(),
            dipole: config.magnitude_dipole()?,
            header: Header::new(),
            config,
            cosmology,
            rate_model,
            cdf,
            model,
            dust,
            host_catalog: self.host_catalog,
            dust_map: self.dust_map,
        };
        generator.header = generator.base_header();

        info!(
            object_type = generator.model.object_type(),
            model = generator.model.source().name(),
            z_min = generator.config.z_min(),
            z_max = generator.config.z_max(),
            "Population generator initialised"
        );
        Ok(generator)
    }
}

/// Seeded generator of object parameter populations.
///
/// Everything derived from the configuration (cosmology, redshift CDF,
/// footprint, object model) is built once by the builder and read-only
/// afterwards, so one generator can serve many requests, including in
/// parallel through [`generate_many`](Self::generate_many).
///
/// Output depends only on the configuration, the root seed and the count.
pub struct PopulationGenerator {
    config: GeneratorConfig,
    cosmology: Box<dyn Cosmology>,
    rate_model: RedshiftRateModel,
    cdf: RedshiftCdf,
    sky: SkySampler,
    frame: FrameCorrector,
    dipole: Option<MagnitudeDipole>,
    model: ObjectModel,
    dust: Option<DustSettings>,
    host_catalog: Option<Arc<dyn HostCatalog>>,
    dust_map: Option<Arc<dyn DustMap>>,
    header: Header,
}

impl fmt::Debug for PopulationGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationGenerator")
            .field("rate_model", &self.rate_model)
            .field("cdf_len", &self.cdf.len())
            .field("sky", &self.sky)
            .field("model", &self.model)
            .field("host_catalog", &self.host_catalog.is_some())
            .field("dust_map", &self.dust_map.is_some())
            .finish()
    }
}

impl PopulationGenerator {
    /// Starts building a generator for `config`.
    pub fn builder(config: GeneratorConfig) -> PopulationGeneratorBuilder {
        PopulationGeneratorBuilder {
            config,
            cosmology: None,
            host_catalog: None,
            dust_map: None,
            redshift_step: None,
        }
    }

    /// Configuration the generator was built from.
    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Cosmology in use.
    #[inline]
    pub fn cosmology(&self) -> &dyn Cosmology {
        self.cosmology.as_ref()
    }

    /// Rate model.
    #[inline]
    pub fn rate_model(&self) -> &RedshiftRateModel {
        &self.rate_model
    }

    /// Redshift CDF built at construction.
    #[inline]
    pub fn cdf(&self) -> &RedshiftCdf {
        &self.cdf
    }

    /// Object model.
    #[inline]
    pub fn model(&self) -> &ObjectModel {
        &self.model
    }

    /// Header shared by every run, without the per-run root seed.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Expected number of objects with peak times in a window of
    /// `duration_days` observer-frame days.
    pub fn expected_count(&self, duration_days: f64) -> f64 {
        self.cdf.total_time_rate() * duration_days / DAYS_PER_YEAR
    }

    /// Generates one population.
    ///
    /// Uses the request's root seed, else the configured one, else a fresh
    /// seed from OS entropy; the seed used is recorded on the result and in
    /// its header.
    ///
    /// # Errors
    ///
    /// Fails without partial output on an invalid request, an exhausted
    /// footprint, a short host catalogue answer or a model error.
    pub fn generate(&self, request: &PopulationRequest) -> Result<Population, GeneratorError> {
        request.validate()?;
        let n = request.count();
        let root_seed = match request.root_seed().or(self.config.root_seed) {
            Some(seed) => seed,
            None => {
                let seed = SeedDeriver::fresh_root_seed();
                warn!(root_seed = seed, "No root seed supplied, drew a fresh one");
                seed
            }
        };

        let start = Instant::now();
        let seeds = SeedTable::derive(root_seed);
        for (role, seed) in seeds.iter() {
            debug!(role = role.as_str(), seed, "Derived seed");
        }
        info!(count = n, root_seed, "Generating population");

        let (t_min, t_max) = request.time_range();
        let mut t0_rng = seeds.rng(SeedRole::PeakTime);
        let sim_t0: Vec<f64> = (0..n).map(|_| t0_rng.gen_uniform_range(t_min, t_max)).collect();

        let (zcos, ra, dec, vpec) = match &self.host_catalog {
            Some(catalog) => {
                let rows = catalog.random_choice(n, seeds.get(SeedRole::Host), &self.cdf);
                if rows.len() != n {
                    return Err(GeneratorError::HostCatalogShort {
                        requested: n,
                        got: rows.len(),
                    });
                }
                (
                    rows.iter().map(|h| h.redshift).collect(),
                    rows.iter().map(|h| h.ra).collect(),
                    rows.iter().map(|h| h.dec).collect(),
                    rows.iter().map(|h| h.v_radial).collect(),
                )
            }
            None => {
                let zcos = self
                    .cdf
                    .sample_many(&seeds.rng(SeedRole::Redshift).uniform_vec(n));
                let (ra, dec) = self.sky.sample(&mut seeds.rng(SeedRole::Coords), n)?;
                let vpec = match &self.config.peculiar_velocity {
                    Some(v) => seeds
                        .rng(SeedRole::PeculiarVelocity)
                        .normal_vec(n, v.mean, v.sigma),
                    None => vec![0.0; n],
                };
                (zcos, ra, dec, vpec)
            }
        };

        let common = CommonParams {
            zcos: &zcos,
            ra: &ra,
            dec: &dec,
        };
        let type_params =
            self.model
                .generate_type_params(n, &common, &mut seeds.rng(SeedRole::TypeParams))?;

        let mw_ebv = match (&self.dust, &self.dust_map) {
            (Some(_), Some(map)) => Some(map.ebv_many(&ra, &dec)),
            _ => None,
        };

        let columns = CommonColumns {
            como_dist: self.cosmology.comoving_distances(&zcos),
            z2cmb: self.frame.z_to_cmb_many(&ra, &dec),
            dip_dm: self.dipole.map(|d| d.delta_mag_many(&ra, &dec)),
            mw_ebv,
            zcos,
            sim_t0,
            ra,
            dec,
            vpec,
        };
        let records = ObjectParameterRecord::assemble(columns, &type_params, self.dust.as_ref())?;

        let mut header = self.header.clone();
        header.insert("root_seed", root_seed);

        info!(
            count = records.len(),
            root_seed,
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            "Generated population"
        );
        Ok(Population::new(root_seed, header, records))
    }

    /// Runs independent requests in parallel.
    ///
    /// Each request keeps its own seed discipline, so results equal those of
    /// sequential [`generate`](Self::generate) calls with the same seeds.
    pub fn generate_many(
        &self,
        requests: &[PopulationRequest],
    ) -> Result<Vec<Population>, GeneratorError> {
        requests.par_iter().map(|r| self.generate(r)).collect()
    }

    fn base_header(&self) -> Header {
        let mut header = Header::new();
        let law = self.rate_model.law();
        let general = self.model.general_params();

        header.insert("obj_type", self.model.object_type());
        header.insert("rate", law.rate_z0());
        header.insert("rate_pw", law.power());
        header.insert("model_name", self.model.source().name());
        header.insert("M0", general.m0);
        header.insert("sigM", general.sig_m);
        for (name, value) in &general.coefficients {
            header.insert(name.as_str(), *value);
        }
        header.insert("mod_fcov", general.flux_covariance);

        if let Some(dust) = &self.dust {
            header.insert("mw_mod", dust.law.name());
            if dust.law.uses_r_v() {
                header.insert("mw_rv", dust.r_v);
            }
        }
        if let Some(v) = &self.config.peculiar_velocity {
            header.insert("m_vp", v.mean);
            header.insert("s_vp", v.sigma);
        }
        self.model.update_header(&mut header);

        if let Some(dipole) = &self.dipole {
            let (ra, dec) = dipole.axis_deg();
            header.insert("dip_A", dipole.a());
            header.insert("dip_B", dipole.b());
            header.insert("dip_ra", ra);
            header.insert("dip_dec", dec);
        }

        header.insert("z_min", self.config.z_min());
        header.insert("z_max", self.config.z_max());
        header.insert("H0", self.cosmology.h0());
        header
    }
}
