//! Cosmological distance models.
//!
//! The population generator only needs two things from a cosmology: the
//! Hubble constant (for magnitude and rate recipes) and the line-of-sight
//! comoving distance, which turns a volumetric rate into a per-shell rate.
//! Both are captured by the [`Cosmology`] trait; [`LambdaCdm`] is the
//! built-in implementation.
//!
//! ```rust
//! use popsim_core::cosmology::{Cosmology, LambdaCdm};
//!
//! let cosmo = LambdaCdm::flat(70.0, 0.3).unwrap();
//! let grid = [0.0, 0.05, 0.1];
//! let distances = cosmo.comoving_distances(&grid);
//! assert_eq!(distances[0], 0.0);
//! assert!(distances[2] > distances[1]);
//! ```

mod lambda_cdm;

pub use lambda_cdm::LambdaCdm;

/// Distance measures required from a cosmological model.
///
/// Implementations must be monotonic in `z` for `z >= 0`.
pub trait Cosmology: Send + Sync {
    /// Hubble constant in km/s/Mpc.
    fn h0(&self) -> f64;

    /// Line-of-sight comoving distance to redshift `z`, in Mpc.
    fn comoving_distance(&self, z: f64) -> f64;

    /// Comoving distances for a batch of redshifts, in Mpc.
    ///
    /// The default evaluates each redshift independently; implementations
    /// may exploit sorted input to integrate incrementally.
    fn comoving_distances(&self, zs: &[f64]) -> Vec<f64> {
        zs.iter().map(|&z| self.comoving_distance(z)).collect()
    }
}
