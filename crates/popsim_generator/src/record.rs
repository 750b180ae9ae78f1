//! Per-object parameter records and the population returned by a run.

use std::collections::BTreeMap;

use popsim_models::dust::DustSettings;
use popsim_models::header::Header;
use popsim_models::params::TypeParams;
use serde::Serialize;

use crate::error::GeneratorError;
use crate::frame::{compose_observed_redshift, peculiar_redshift};

/// Parameters of one simulated object.
///
/// Records are built in one pass once every column has been drawn, and are
/// immutable afterwards. Serialised field names follow the column names
/// downstream synthesis expects; type-specific and dust parameters are
/// flattened into the same row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectParameterRecord {
    zcos: f64,
    z2cmb: f64,
    como_dist: f64,
    sim_t0: f64,
    ra: f64,
    dec: f64,
    vpec: f64,
    #[serde(rename = "dip_dM", skip_serializing_if = "Option::is_none")]
    dip_dm: Option<f64>,
    #[serde(flatten)]
    type_params: BTreeMap<String, f64>,
    #[serde(flatten)]
    dust: BTreeMap<String, f64>,
}

/// Column-oriented inputs to [`ObjectParameterRecord::assemble`].
#[derive(Debug, Default)]
pub(crate) struct CommonColumns {
    pub zcos: Vec<f64>,
    pub z2cmb: Vec<f64>,
    pub como_dist: Vec<f64>,
    pub sim_t0: Vec<f64>,
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub vpec: Vec<f64>,
    pub dip_dm: Option<Vec<f64>>,
    pub mw_ebv: Option<Vec<f64>>,
}

impl ObjectParameterRecord {
    /// Builds one record per object from the drawn columns.
    ///
    /// Every column must hold one value per object; a mismatch means a
    /// sampling stage dropped or duplicated objects and is reported rather
    /// than truncated.
    pub(crate) fn assemble(
        columns: CommonColumns,
        type_params: &TypeParams,
        dust: Option<&DustSettings>,
    ) -> Result<Vec<Self>, GeneratorError> {
        let n = columns.zcos.len();
        let lengths = [
            ("z2cmb", columns.z2cmb.len()),
            ("como_dist", columns.como_dist.len()),
            ("sim_t0", columns.sim_t0.len()),
            ("ra", columns.ra.len()),
            ("dec", columns.dec.len()),
            ("vpec", columns.vpec.len()),
            ("dip_dM", columns.dip_dm.as_ref().map_or(n, Vec::len)),
            ("mw_ebv", columns.mw_ebv.as_ref().map_or(n, Vec::len)),
            ("type parameters", type_params.len()),
        ];
        if let Some((name, got)) = lengths.iter().find(|(_, len)| *len != n) {
            return Err(GeneratorError::InvalidRequest(format!(
                "column '{}' has {} values for {} objects",
                name, got, n
            )));
        }

        let records = (0..n)
            .map(|i| Self {
                zcos: columns.zcos[i],
                z2cmb: columns.z2cmb[i],
                como_dist: columns.como_dist[i],
                sim_t0: columns.sim_t0[i],
                ra: columns.ra[i],
                dec: columns.dec[i],
                vpec: columns.vpec[i],
                dip_dm: columns.dip_dm.as_ref().map(|d| d[i]),
                type_params: type_params
                    .row(i)
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                dust: match (dust, &columns.mw_ebv) {
                    (Some(settings), Some(ebv)) => settings
                        .object_params(ebv[i])
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                    _ => BTreeMap::new(),
                },
            })
            .collect();
        Ok(records)
    }

    /// Cosmological redshift.
    #[inline]
    pub fn zcos(&self) -> f64 {
        self.zcos
    }

    /// Heliocentric to CMB frame redshift correction.
    #[inline]
    pub fn z2cmb(&self) -> f64 {
        self.z2cmb
    }

    /// Comoving distance in Mpc.
    #[inline]
    pub fn comoving_distance(&self) -> f64 {
        self.como_dist
    }

    /// Peak time.
    #[inline]
    pub fn peak_time(&self) -> f64 {
        self.sim_t0
    }

    /// Right ascension in radians.
    #[inline]
    pub fn ra(&self) -> f64 {
        self.ra
    }

    /// Declination in radians.
    #[inline]
    pub fn dec(&self) -> f64 {
        self.dec
    }

    /// Line-of-sight peculiar velocity in km/s.
    #[inline]
    pub fn peculiar_velocity(&self) -> f64 {
        self.vpec
    }

    /// Dipole magnitude offset, when a dipole is configured.
    #[inline]
    pub fn dipole_delta_mag(&self) -> Option<f64> {
        self.dip_dm
    }

    /// Object-type parameters by name.
    #[inline]
    pub fn type_params(&self) -> &BTreeMap<String, f64> {
        &self.type_params
    }

    /// One object-type parameter.
    pub fn type_param(&self, name: &str) -> Option<f64> {
        self.type_params.get(name).copied()
    }

    /// Milky Way dust parameters (`mw_ebv`, and `mw_r_v` for laws that use
    /// it); empty without dust.
    #[inline]
    pub fn dust_params(&self) -> &BTreeMap<String, f64> {
        &self.dust
    }

    /// Observed redshift `(1+zcos)(1+z2cmb)(1+vpec/c) − 1`.
    pub fn observed_redshift(&self) -> f64 {
        compose_observed_redshift(self.zcos, self.z2cmb, peculiar_redshift(self.vpec))
    }

    /// Observer-frame window `[t0 + t_min(1+z_obs), t0 + t_max(1+z_obs)]` for
    /// a source valid between rest-frame phases `bounds`.
    pub fn observer_time_window(&self, bounds: (f64, f64)) -> (f64, f64) {
        let stretch = 1.0 + self.observed_redshift();
        (
            self.sim_t0 + bounds.0 * stretch,
            self.sim_t0 + bounds.1 * stretch,
        )
    }
}

/// Result of one generation call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Population {
    root_seed: u64,
    header: Header,
    records: Vec<ObjectParameterRecord>,
}

impl Population {
    pub(crate) fn new(root_seed: u64, header: Header, records: Vec<ObjectParameterRecord>) -> Self {
        Self {
            root_seed,
            header,
            records,
        }
    }

    /// Root seed actually used, including one drawn because none was given.
    #[inline]
    pub fn root_seed(&self) -> u64 {
        self.root_seed
    }

    /// Settings the run was produced with.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Records in generation order.
    #[inline]
    pub fn records(&self) -> &[ObjectParameterRecord] {
        &self.records
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true without records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits into header and records.
    pub fn into_parts(self) -> (Header, Vec<ObjectParameterRecord>) {
        (self.header, self.records)
    }
}
