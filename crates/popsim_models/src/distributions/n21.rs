//! Redshift-dependent stretch distribution of Nicolas et al. (2021).
//!
//! Objects are split into a "young" population, with stretch drawn from a
//! single Gaussian, and an "old" population drawn from a two-Gaussian
//! mixture. The young fraction grows with redshift as
//!
//! ```text
//! δ(z) = 1 / (1 / (K (1+z)^2.8) + 1)
//! ```

use popsim_core::math::interpolators::LinearInterpolator;
use popsim_core::rng::SimRng;
use std::f64::consts::PI;

use crate::error::ModelError;

/// Weight of the first Gaussian in the old-population mixture.
pub const A: f64 = 0.51;
/// Young-fraction normalisation.
pub const K: f64 = 0.87;
/// Mean of the young (and first old) Gaussian.
pub const MU1: f64 = 0.37;
/// Mean of the second old Gaussian.
pub const MU2: f64 = -1.22;
/// Width of the young (and first old) Gaussian.
pub const SIG1: f64 = 0.61;
/// Width of the second old Gaussian.
pub const SIG2: f64 = 0.56;

/// Redshift exponent of the young fraction.
const Z_POWER: f64 = 2.8;

/// Points in the old-population CDF grid.
const GRID_POINTS: usize = 100_000;

fn gauss(mu: f64, sig: f64, x: f64) -> f64 {
    (-0.5 * ((x - mu) / sig).powi(2)).exp() / (2.0 * PI * sig * sig).sqrt()
}

/// Precomputed old-population CDF and sampler.
///
/// The CDF is tabulated once on a fixed grid spanning
/// `[μ2 − 10σ2, μ1 + 10σ1]` by a running sum of the density times the grid
/// step, independent of redshift.
///
/// # Example
///
/// ```
/// use popsim_core::rng::SimRng;
/// use popsim_models::distributions::N21Stretch;
///
/// let model = N21Stretch::new().unwrap();
/// let mut rng = SimRng::from_seed(7);
/// let x1 = model.sample(&mut rng, &[0.05, 0.5, 1.0]);
/// assert_eq!(x1.len(), 3);
/// assert!(model.young_fraction(1.0) > model.young_fraction(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct N21Stretch {
    old_inverse_cdf: LinearInterpolator<f64>,
}

impl N21Stretch {
    /// Tabulates the old-population CDF.
    ///
    /// # Errors
    ///
    /// Propagates interpolation table errors; cannot fail for the fixed
    /// population constants.
    pub fn new() -> Result<Self, ModelError> {
        let lo = MU2 - 10.0 * SIG2;
        let hi = MU1 + 10.0 * SIG1;
        let step = (hi - lo) / (GRID_POINTS - 1) as f64;

        let mut x: Vec<f64> = (0..GRID_POINTS).map(|i| lo + i as f64 * step).collect();
        x[GRID_POINTS - 1] = hi;
        let dx = x[1] - x[0];

        let mut running = 0.0;
        let cdf: Vec<f64> = x
            .iter()
            .map(|&xi| {
                running += A * gauss(MU1, SIG1, xi) + (1.0 - A) * gauss(MU2, SIG2, xi);
                running * dx
            })
            .collect();

        Ok(Self {
            old_inverse_cdf: LinearInterpolator::new(&cdf, &x)?,
        })
    }

    /// Probability that an object at redshift `z` belongs to the young population.
    #[inline]
    pub fn young_fraction(&self, z: f64) -> f64 {
        1.0 / (1.0 / (K * (1.0 + z).powf(Z_POWER)) + 1.0)
    }

    /// Stretch at old-population cumulative probability `u`.
    #[inline]
    pub fn old_quantile(&self, u: f64) -> f64 {
        self.old_inverse_cdf.interpolate_clamped(u)
    }

    /// Draws one stretch value per redshift.
    ///
    /// Draw order is fixed: all population-choice uniforms, then all young
    /// Gaussian variates, then all old-population uniforms.
    pub fn sample(&self, rng: &mut SimRng, z: &[f64]) -> Vec<f64> {
        let n = z.len();
        let young_or_old = rng.uniform_vec(n);
        let young = rng.normal_vec(n, MU1, SIG1);
        let old = rng.uniform_vec(n);

        z.iter()
            .zip(young_or_old.iter().zip(young.iter().zip(&old)))
            .map(|(&zi, (&u, (&y, &o)))| {
                if u < self.young_fraction(zi) {
                    y
                } else {
                    self.old_quantile(o)
                }
            })
            .collect()
    }
}
