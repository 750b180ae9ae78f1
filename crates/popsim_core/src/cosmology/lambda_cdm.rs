//! Dark-energy cosmology with a (w0, wa) equation of state.

use super::Cosmology;
use crate::constants::C_LIGHT_KMS;
use crate::math::quadrature::{gauss_legendre_5, simpson};
use crate::types::CosmologyError;

/// Simpson panels per unit redshift for single-point distances.
const PANELS_PER_UNIT_Z: f64 = 1000.0;

/// Minimum Simpson panel count for single-point distances.
const MIN_PANELS: usize = 64;

/// Matter + curvature + dark energy cosmology (radiation neglected).
///
/// The dimensionless expansion rate is
///
/// ```text
/// E(z)² = Ωm (1+z)³ + Ωk (1+z)² + Ωde (1+z)^{3(1+w0+wa)} exp(-3 wa z / (1+z))
/// ```
///
/// with `Ωk = 1 − Ωm − Ωde`. With `w0 = -1`, `wa = 0` this is ΛCDM.
///
/// # Examples
///
/// ```rust
/// use popsim_core::cosmology::{Cosmology, LambdaCdm};
///
/// let flat = LambdaCdm::flat(70.0, 0.3).unwrap();
/// assert_eq!(flat.ok0(), 0.0);
/// assert_eq!(flat.h0(), 70.0);
///
/// let wcdm = LambdaCdm::new(70.0, 0.3, 0.7).unwrap().with_dark_energy(-0.9, 0.1);
/// assert!(wcdm.comoving_distance(0.5) != flat.comoving_distance(0.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LambdaCdm {
    h0: f64,
    om0: f64,
    ode0: f64,
    w0: f64,
    wa: f64,
}

impl LambdaCdm {
    /// Creates a cosmology with explicit matter and dark-energy densities.
    ///
    /// # Errors
    ///
    /// Returns `CosmologyError` if `h0` is not strictly positive or a
    /// density is negative or not finite.
    pub fn new(h0: f64, om0: f64, ode0: f64) -> Result<Self, CosmologyError> {
        if !(h0.is_finite() && h0 > 0.0) {
            return Err(CosmologyError::InvalidHubbleConstant(h0));
        }
        if !(om0.is_finite() && om0 >= 0.0) {
            return Err(CosmologyError::InvalidDensity {
                name: "Om0",
                value: om0,
            });
        }
        if !ode0.is_finite() {
            return Err(CosmologyError::InvalidDensity {
                name: "Ode0",
                value: ode0,
            });
        }
        Ok(Self {
            h0,
            om0,
            ode0,
            w0: -1.0,
            wa: 0.0,
        })
    }

    /// Creates a spatially flat ΛCDM cosmology (`Ωde = 1 − Ωm`).
    pub fn flat(h0: f64, om0: f64) -> Result<Self, CosmologyError> {
        Self::new(h0, om0, 1.0 - om0)
    }

    /// Replaces the dark-energy equation of state `w(a) = w0 + wa (1 − a)`.
    pub fn with_dark_energy(mut self, w0: f64, wa: f64) -> Self {
        self.w0 = w0;
        self.wa = wa;
        self
    }

    /// Matter density today.
    #[inline]
    pub fn om0(&self) -> f64 {
        self.om0
    }

    /// Dark-energy density today.
    #[inline]
    pub fn ode0(&self) -> f64 {
        self.ode0
    }

    /// Curvature density today.
    #[inline]
    pub fn ok0(&self) -> f64 {
        1.0 - self.om0 - self.ode0
    }

    /// Dark-energy equation of state `(w0, wa)`.
    #[inline]
    pub fn dark_energy(&self) -> (f64, f64) {
        (self.w0, self.wa)
    }

    /// Hubble distance `c / H0` in Mpc.
    #[inline]
    pub fn hubble_distance(&self) -> f64 {
        C_LIGHT_KMS / self.h0
    }

    /// Squared dimensionless expansion rate E(z)².
    #[inline]
    pub fn e2(&self, z: f64) -> f64 {
        let zp1 = 1.0 + z;
        let de = zp1.powf(3.0 * (1.0 + self.w0 + self.wa)) * (-3.0 * self.wa * z / zp1).exp();
        self.om0 * zp1.powi(3) + self.ok0() * zp1 * zp1 + self.ode0 * de
    }

    /// Inverse dimensionless expansion rate 1 / E(z).
    #[inline]
    pub fn inv_efunc(&self, z: f64) -> f64 {
        1.0 / self.e2(z).sqrt()
    }

    /// Checks that E(z)² stays positive on `[0, z_max]`.
    ///
    /// Closed models with large Ωm can recollapse; integrating through that
    /// point would produce NaN distances.
    pub fn check_expansion(&self, z_max: f64) -> Result<(), CosmologyError> {
        const SAMPLES: usize = 1000;
        for i in 0..=SAMPLES {
            let z = z_max * i as f64 / SAMPLES as f64;
            if !(self.e2(z) > 0.0) {
                return Err(CosmologyError::NonPositiveExpansion { z });
            }
        }
        Ok(())
    }
}

impl Cosmology for LambdaCdm {
    #[inline]
    fn h0(&self) -> f64 {
        self.h0
    }

    fn comoving_distance(&self, z: f64) -> f64 {
        let panels = ((z.abs() * PANELS_PER_UNIT_Z).ceil() as usize).max(MIN_PANELS);
        self.hubble_distance() * simpson(|x| self.inv_efunc(x), 0.0, z, panels)
    }

    /// Sorted input is integrated shell by shell, so a grid of `n` points
    /// costs `n` five-point quadratures instead of `n` full integrals.
    fn comoving_distances(&self, zs: &[f64]) -> Vec<f64> {
        let sorted = zs.windows(2).all(|w| w[1] >= w[0]);
        if !sorted || zs.is_empty() {
            return zs.iter().map(|&z| self.comoving_distance(z)).collect();
        }

        let dh = self.hubble_distance();
        let mut out = Vec::with_capacity(zs.len());
        let mut acc = self.comoving_distance(zs[0]);
        out.push(acc);
        for w in zs.windows(2) {
            acc += dh * gauss_legendre_5(|x| self.inv_efunc(x), w[0], w[1]);
            out.push(acc);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_densities() {
        let c = LambdaCdm::flat(70.0, 0.3).unwrap();
        assert_relative_eq!(c.ode0(), 0.7);
        assert_eq!(c.ok0(), 0.0);
        assert_relative_eq!(c.e2(0.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            LambdaCdm::flat(0.0, 0.3),
            Err(CosmologyError::InvalidHubbleConstant(_))
        ));
        assert!(matches!(
            LambdaCdm::flat(70.0, -0.1),
            Err(CosmologyError::InvalidDensity { name: "Om0", .. })
        ));
        assert!(matches!(
            LambdaCdm::new(70.0, 0.3, f64::NAN),
            Err(CosmologyError::InvalidDensity { name: "Ode0", .. })
        ));
    }

    #[test]
    fn test_comoving_distance_reference_values() {
        // Flat ΛCDM, H0 = 70, Om0 = 0.3, no radiation.
        let c = LambdaCdm::flat(70.0, 0.3).unwrap();
        assert_relative_eq!(c.comoving_distance(0.1), 418.45, max_relative = 1e-3);
        assert_relative_eq!(c.comoving_distance(1.0), 3303.83, max_relative = 1e-3);
        assert_eq!(c.comoving_distance(0.0), 0.0);
    }

    #[test]
    fn test_low_redshift_hubble_law() {
        let c = LambdaCdm::flat(70.0, 0.3).unwrap();
        let z = 1e-4;
        assert_relative_eq!(c.comoving_distance(z), C_LIGHT_KMS * z / 70.0, max_relative = 1e-4);
    }

    #[test]
    fn test_einstein_de_sitter_closed_form() {
        // Ωm = 1: D_C = 2 D_H (1 - 1/sqrt(1+z))
        let c = LambdaCdm::flat(70.0, 1.0).unwrap();
        for z in [0.1, 0.5, 2.0] {
            let expected = 2.0 * c.hubble_distance() * (1.0 - 1.0 / (1.0_f64 + z).sqrt());
            assert_relative_eq!(c.comoving_distance(z), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_grid_matches_pointwise() {
        let c = LambdaCdm::flat(67.7, 0.31).unwrap();
        let grid: Vec<f64> = (0..=200).map(|i| 0.01 + i as f64 * 0.005).collect();
        let batch = c.comoving_distances(&grid);
        for (z, d) in grid.iter().zip(batch.iter()) {
            assert_relative_eq!(*d, c.comoving_distance(*z), max_relative = 1e-9);
        }
    }

    #[test]
    fn test_unsorted_batch_falls_back() {
        let c = LambdaCdm::flat(70.0, 0.3).unwrap();
        let d = c.comoving_distances(&[0.5, 0.1]);
        assert!(d[0] > d[1]);
    }

    #[test]
    fn test_recollapsing_model_detected() {
        // Ωk = -1.1 drives E(z)² negative near z = 1.
        let c = LambdaCdm::new(70.0, 0.1, 2.0).unwrap();
        assert!(matches!(
            c.check_expansion(10.0),
            Err(CosmologyError::NonPositiveExpansion { .. })
        ));
        assert!(LambdaCdm::flat(70.0, 0.3).unwrap().check_expansion(10.0).is_ok());
    }
}
