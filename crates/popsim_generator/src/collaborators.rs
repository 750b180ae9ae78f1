//! External collaborators: host galaxy catalogues and Milky Way dust maps.
//!
//! Both are supplied by the caller at build time and shared read-only
//! between generation calls, hence the `Send + Sync` bounds.

use popsim_core::rng::SimRng;

use crate::rate::RedshiftCdf;

/// One host galaxy drawn for one object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostRow {
    /// Cosmological redshift
    pub redshift: f64,
    /// Right ascension in radians
    pub ra: f64,
    /// Declination in radians
    pub dec: f64,
    /// Line-of-sight peculiar velocity in km/s
    pub v_radial: f64,
}

/// Source of host galaxies.
///
/// Implementations must be deterministic in `seed` and return exactly `n`
/// rows; the generator rejects any other length.
pub trait HostCatalog: Send + Sync {
    /// Draws `n` hosts, weighting by the redshift distribution `cdf`.
    fn random_choice(&self, n: usize, seed: u64, cdf: &RedshiftCdf) -> Vec<HostRow>;
}

/// Host catalogue held in memory.
///
/// Rows are drawn with replacement, each weighted by the rate density at its
/// redshift, so hosts outside the CDF range are never chosen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostTable {
    rows: Vec<HostRow>,
}

impl HostTable {
    /// Wraps `rows`.
    pub fn new(rows: Vec<HostRow>) -> Self {
        Self { rows }
    }

    /// Catalogue rows.
    #[inline]
    pub fn rows(&self) -> &[HostRow] {
        &self.rows
    }
}

impl HostCatalog for HostTable {
    /// Returns fewer than `n` rows when no host lies inside the CDF range.
    fn random_choice(&self, n: usize, seed: u64, cdf: &RedshiftCdf) -> Vec<HostRow> {
        let mut cumulative = Vec::with_capacity(self.rows.len());
        let mut running = 0.0;
        for row in &self.rows {
            running += cdf.density(row.redshift);
            cumulative.push(running);
        }
        if !(running > 0.0) {
            return Vec::new();
        }

        let mut rng = SimRng::from_seed(seed);
        (0..n)
            .map(|_| {
                let target = rng.gen_uniform() * running;
                let i = cumulative
                    .partition_point(|&c| c <= target)
                    .min(self.rows.len() - 1);
                self.rows[i]
            })
            .collect()
    }
}

/// Milky Way reddening map.
pub trait DustMap: Send + Sync {
    /// E(B−V) towards equatorial `(ra, dec)` in radians.
    fn ebv(&self, ra: f64, dec: f64) -> f64;

    /// E(B−V) for each position.
    fn ebv_many(&self, ra: &[f64], dec: &[f64]) -> Vec<f64> {
        ra.iter().zip(dec).map(|(&r, &d)| self.ebv(r, d)).collect()
    }
}

impl<F> DustMap for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn ebv(&self, ra: f64, dec: f64) -> f64 {
        self(ra, dec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::{RateLaw, RedshiftRateModel};
    use popsim_core::cosmology::LambdaCdm;

    fn cdf() -> RedshiftCdf {
        RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap())
            .with_step(1e-4)
            .unwrap()
            .build_cdf(0.01, 0.1, &LambdaCdm::flat(70.0, 0.3).unwrap())
            .unwrap()
    }

    fn row(redshift: f64) -> HostRow {
        HostRow {
            redshift,
            ra: redshift * 10.0,
            dec: -redshift,
            v_radial: 100.0,
        }
    }

    #[test]
    fn test_choice_is_seeded() {
        let table = HostTable::new((1..20).map(|i| row(i as f64 * 0.005)).collect());
        let cdf = cdf();
        let a = table.random_choice(50, 7, &cdf);
        let b = table.random_choice(50, 7, &cdf);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_hosts_outside_range_never_drawn() {
        let table = HostTable::new(vec![row(0.005), row(0.05), row(0.5)]);
        let chosen = table.random_choice(200, 3, &cdf());
        assert!(chosen.iter().all(|h| h.redshift == 0.05));
    }

    #[test]
    fn test_no_eligible_hosts_returns_nothing() {
        let table = HostTable::new(vec![row(0.5)]);
        assert!(table.random_choice(5, 3, &cdf()).is_empty());
    }

    #[test]
    fn test_closure_is_a_dust_map() {
        let map = |_ra: f64, dec: f64| 0.1 * dec.abs();
        assert_eq!(map.ebv_many(&[0.0, 1.0], &[0.5, -1.0]), vec![0.05, 0.1]);
    }
}
