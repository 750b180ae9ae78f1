//! Volumetric rate law and the redshift CDF built from it.
//!
//! The number of objects per observer year in a thin redshift shell is
//!
//! ```text
//! dN/dt = rate(z_c) · 4π/3 (D(z_i+1)³ − D(z_i)³) / (1 + z_c)
//! ```
//!
//! with `D` the comoving distance and `z_c` the shell centre; the `1 + z`
//! factor converts rest-frame time to observer time. Accumulating shells
//! over a fine grid and normalising gives a tabulated CDF that is inverted
//! by linear interpolation.

use std::f64::consts::PI;

use popsim_core::cosmology::Cosmology;
use popsim_core::math::interpolators::LinearInterpolator;
use tracing::debug;

use crate::error::GeneratorError;

/// Default redshift grid step.
pub const REDSHIFT_STEP: f64 = 1e-5;

/// `ptf19` rate at H0 = 70 km/s/Mpc, in objects · Mpc⁻³ · yr⁻¹.
const PTF19_RATE: f64 = 2.43e-5;

/// Power-law volumetric rate `rate(z) = rate_z0 · (1+z)^power`.
///
/// # Example
///
/// ```
/// use popsim_generator::rate::RateLaw;
///
/// let law = RateLaw::new(3e-5, 1.5).unwrap();
/// assert_eq!(law.rate(0.0), 3e-5);
/// assert!(law.rate(1.0) > law.rate(0.5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateLaw {
    rate_z0: f64,
    power: f64,
}

impl RateLaw {
    /// Creates a rate law.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Config`] for a negative or non-finite rate or a
    /// non-finite index.
    pub fn new(rate_z0: f64, power: f64) -> Result<Self, GeneratorError> {
        if !(rate_z0.is_finite() && rate_z0 >= 0.0) {
            return Err(GeneratorError::Config(format!(
                "rate must be non-negative and finite, got {}",
                rate_z0
            )));
        }
        if !power.is_finite() {
            return Err(GeneratorError::Config(format!(
                "rate_power must be finite, got {}",
                power
            )));
        }
        Ok(Self { rate_z0, power })
    }

    /// PTF 2019 Type Ia rate scaled to `h0`: `2.43e-5 · (70/H0)³`, flat in z.
    pub fn ptf19(h0: f64) -> Result<Self, GeneratorError> {
        Self::new(PTF19_RATE * (70.0 / h0).powi(3), 0.0)
    }

    /// Rate at `z = 0`.
    #[inline]
    pub fn rate_z0(&self) -> f64 {
        self.rate_z0
    }

    /// Power-law index.
    #[inline]
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Volumetric rate at redshift `z`.
    #[inline]
    pub fn rate(&self, z: f64) -> f64 {
        self.rate_z0 * (1.0 + z).powf(self.power)
    }

    /// Volumetric rate at each redshift.
    pub fn rate_many(&self, zs: &[f64]) -> Vec<f64> {
        zs.iter().map(|&z| self.rate(z)).collect()
    }
}

/// Builds redshift CDFs for one rate law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RedshiftRateModel {
    law: RateLaw,
    step: f64,
}

impl RedshiftRateModel {
    /// Creates a model using the default grid step.
    pub fn new(law: RateLaw) -> Self {
        Self {
            law,
            step: REDSHIFT_STEP,
        }
    }

    /// Uses a different grid step.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Config`] unless `step` is positive and finite.
    pub fn with_step(mut self, step: f64) -> Result<Self, GeneratorError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(GeneratorError::Config(format!(
                "redshift grid step must be positive, got {}",
                step
            )));
        }
        self.step = step;
        Ok(self)
    }

    /// Rate law.
    #[inline]
    pub fn law(&self) -> &RateLaw {
        &self.law
    }

    /// Volumetric rate at `z`.
    #[inline]
    pub fn rate(&self, z: f64) -> f64 {
        self.law.rate(z)
    }

    /// Tabulates the redshift CDF on `[z_min, z_max]`.
    ///
    /// The grid has `⌊(z_max − z_min) / step⌋` evenly spaced edges (at least
    /// two) including both ends.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::InvalidRedshiftRange`] unless `0 <= z_min < z_max`
    /// - [`GeneratorError::EmptyRate`] when the total rate is zero or not finite
    pub fn build_cdf(
        &self,
        z_min: f64,
        z_max: f64,
        cosmology: &dyn Cosmology,
    ) -> Result<RedshiftCdf, GeneratorError> {
        if !(z_min.is_finite() && z_max.is_finite() && z_min >= 0.0 && z_min < z_max) {
            return Err(GeneratorError::InvalidRedshiftRange { z_min, z_max });
        }

        let n_edges = (((z_max - z_min) / self.step) as usize).max(2);
        let dz = (z_max - z_min) / (n_edges - 1) as f64;
        let mut z: Vec<f64> = (0..n_edges).map(|i| z_min + i as f64 * dz).collect();
        z[n_edges - 1] = z_max;

        let distances = cosmology.comoving_distances(&z);
        let shell_time_rate: Vec<f64> = z
            .windows(2)
            .zip(distances.windows(2))
            .map(|(zw, dw)| {
                let centre = 0.5 * (zw[0] + zw[1]);
                let volume = 4.0 * PI / 3.0 * (dw[1].powi(3) - dw[0].powi(3));
                self.law.rate(centre) * volume / (1.0 + centre)
            })
            .collect();

        let total: f64 = shell_time_rate.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(GeneratorError::EmptyRate {
                rate_z0: self.law.rate_z0(),
                power: self.law.power(),
                z_min,
                z_max,
                total,
            });
        }

        let mut cdf = Vec::with_capacity(n_edges);
        cdf.push(0.0);
        let mut running = 0.0;
        for r in &shell_time_rate {
            running += r;
            cdf.push(running / total);
        }

        debug!(
            z_min,
            z_max,
            edges = n_edges,
            total_time_rate = total,
            "Built redshift CDF"
        );

        Ok(RedshiftCdf {
            inverse: LinearInterpolator::new(&cdf, &z)?,
            shell_time_rate,
        })
    }
}

/// Tabulated redshift CDF with its per-shell observer-frame rates.
///
/// Built once per (rate law, cosmology, redshift range) and read-only
/// afterwards.
#[derive(Clone, Debug)]
pub struct RedshiftCdf {
    /// Maps cumulative probability to redshift.
    inverse: LinearInterpolator<f64>,
    shell_time_rate: Vec<f64>,
}

impl RedshiftCdf {
    /// Grid edges in redshift.
    #[inline]
    pub fn z(&self) -> &[f64] {
        self.inverse.ys()
    }

    /// Cumulative probability at each grid edge, from exactly 0 to exactly 1.
    #[inline]
    pub fn cdf(&self) -> &[f64] {
        self.inverse.xs()
    }

    /// Number of grid edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    /// Always false; a CDF has at least two edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    /// `(z_min, z_max)`.
    pub fn z_range(&self) -> (f64, f64) {
        let z = self.z();
        (z[0], z[z.len() - 1])
    }

    /// Shell centre redshifts.
    pub fn shell_centres(&self) -> Vec<f64> {
        self.z().windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Objects per observer year in each shell.
    #[inline]
    pub fn shell_time_rates(&self) -> &[f64] {
        &self.shell_time_rate
    }

    /// Objects per observer year over the whole range.
    pub fn total_time_rate(&self) -> f64 {
        self.shell_time_rate.iter().sum()
    }

    /// Redshift at cumulative probability `u`.
    ///
    /// `u <= 0` maps to `z_min` and `u >= 1` to `z_max`; there is no
    /// extrapolation.
    #[inline]
    pub fn sample(&self, u: f64) -> f64 {
        self.inverse.interpolate_clamped(u)
    }

    /// Redshift for each cumulative probability.
    pub fn sample_many(&self, us: &[f64]) -> Vec<f64> {
        us.iter().map(|&u| self.sample(u)).collect()
    }

    /// Cumulative probability at redshift `z`, clamped to `[0, 1]`.
    pub fn probability(&self, z: f64) -> f64 {
        let zs = self.z();
        let ps = self.cdf();
        let last = zs.len() - 1;
        if z <= zs[0] {
            return 0.0;
        }
        if z >= zs[last] {
            return 1.0;
        }
        let i = zs.partition_point(|&zi| zi <= z) - 1;
        let t = (z - zs[i]) / (zs[i + 1] - zs[i]);
        ps[i] + (ps[i + 1] - ps[i]) * t
    }

    /// Probability density in redshift at `z`; zero outside the grid.
    pub fn density(&self, z: f64) -> f64 {
        let zs = self.z();
        let ps = self.cdf();
        let last = zs.len() - 1;
        if !(z >= zs[0] && z <= zs[last]) {
            return 0.0;
        }
        let i = zs.partition_point(|&zi| zi <= z).saturating_sub(1).min(last - 1);
        (ps[i + 1] - ps[i]) / (zs[i + 1] - zs[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use popsim_core::cosmology::LambdaCdm;

    /// Euclidean toy model: D(z) = k·z.
    struct Linear(f64);

    impl Cosmology for Linear {
        fn h0(&self) -> f64 {
            70.0
        }

        fn comoving_distance(&self, z: f64) -> f64 {
            self.0 * z
        }
    }

    fn flat() -> LambdaCdm {
        LambdaCdm::flat(70.0, 0.3).unwrap()
    }

    #[test]
    fn test_rate_at_z0() {
        for power in [-2.0, 0.0, 1.5, 2.7] {
            let law = RateLaw::new(2.5e-5, power).unwrap();
            assert_eq!(law.rate(0.0), 2.5e-5);
        }
    }

    #[test]
    fn test_ptf19_scaling() {
        assert_relative_eq!(RateLaw::ptf19(70.0).unwrap().rate_z0(), 2.43e-5);
        assert_relative_eq!(
            RateLaw::ptf19(35.0).unwrap().rate_z0(),
            2.43e-5 * 8.0,
            epsilon = 1e-18
        );
        assert_eq!(RateLaw::ptf19(70.0).unwrap().power(), 0.0);
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(RateLaw::new(-1e-5, 0.0).is_err());
        assert!(RateLaw::new(1e-5, f64::NAN).is_err());
    }

    #[test]
    fn test_cdf_endpoints() {
        let model = RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap());
        let cdf = model.build_cdf(0.01, 0.1, &flat()).unwrap();

        assert_eq!(cdf.cdf()[0], 0.0);
        assert_eq!(*cdf.cdf().last().unwrap(), 1.0);
        assert_eq!(cdf.z_range(), (0.01, 0.1));
        assert_eq!(cdf.sample(0.0), 0.01);
        assert_eq!(cdf.sample(1.0), 0.1);
        assert!(cdf.cdf().windows(2).all(|w| w[1] >= w[0]));
        // (0.1 - 0.01) / 1e-5 rounds to just above 9000 in f64
        assert_eq!(cdf.len(), ((0.1 - 0.01) / REDSHIFT_STEP) as usize);
        assert_eq!(cdf.len(), 9000);
        assert_eq!(cdf.shell_time_rates().len(), cdf.len() - 1);
    }

    #[test]
    fn test_total_time_rate_matches_euclidean_integral() {
        let k = 4282.749_400_1;
        let rate = 3e-5;
        let model = RedshiftRateModel::new(RateLaw::new(rate, 0.0).unwrap());
        let cdf = model.build_cdf(0.01, 0.1, &Linear(k)).unwrap();

        // ∫ z²/(1+z) dz = z²/2 − z + ln(1+z)
        let f = |z: f64| z * z / 2.0 - z + (1.0 + z).ln();
        let expected = rate * 4.0 * PI * k.powi(3) * (f(0.1) - f(0.01));
        assert_relative_eq!(cdf.total_time_rate(), expected, max_relative = 1e-6);
    }

    #[test]
    fn test_steeper_rate_pushes_mass_to_high_z() {
        let cosmo = flat();
        let flat_rate = RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap())
            .with_step(1e-4)
            .unwrap()
            .build_cdf(0.01, 0.5, &cosmo)
            .unwrap();
        let steep = RedshiftRateModel::new(RateLaw::new(3e-5, 3.0).unwrap())
            .with_step(1e-4)
            .unwrap()
            .build_cdf(0.01, 0.5, &cosmo)
            .unwrap();
        assert!(steep.sample(0.5) > flat_rate.sample(0.5));
    }

    #[test]
    fn test_probability_inverts_sample() {
        let cdf = RedshiftRateModel::new(RateLaw::new(3e-5, 1.0).unwrap())
            .with_step(1e-4)
            .unwrap()
            .build_cdf(0.05, 0.3, &flat())
            .unwrap();
        for u in [0.1, 0.25, 0.5, 0.9] {
            assert_abs_diff_eq!(cdf.probability(cdf.sample(u)), u, epsilon = 1e-9);
        }
        assert_eq!(cdf.probability(0.0), 0.0);
        assert_eq!(cdf.probability(1.0), 1.0);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let cdf = RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap())
            .with_step(1e-4)
            .unwrap()
            .build_cdf(0.01, 0.2, &flat())
            .unwrap();
        let integral: f64 = cdf
            .shell_centres()
            .iter()
            .zip(cdf.z().windows(2))
            .map(|(&zc, w)| cdf.density(zc) * (w[1] - w[0]))
            .sum();
        assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-9);
        assert_eq!(cdf.density(0.3), 0.0);
        assert!(cdf.density(0.2) > cdf.density(0.02));
    }

    #[test]
    fn test_invalid_ranges() {
        let model = RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap());
        for (lo, hi) in [(0.1, 0.1), (0.2, 0.1), (-0.1, 0.1), (0.0, f64::INFINITY)] {
            assert!(matches!(
                model.build_cdf(lo, hi, &flat()),
                Err(GeneratorError::InvalidRedshiftRange { .. })
            ));
        }
    }

    #[test]
    fn test_zero_rate_is_empty() {
        let model = RedshiftRateModel::new(RateLaw::new(0.0, 0.0).unwrap());
        assert!(matches!(
            model.build_cdf(0.01, 0.1, &flat()),
            Err(GeneratorError::EmptyRate { .. })
        ));
    }

    #[test]
    fn test_tiny_range_still_has_two_edges() {
        let model = RedshiftRateModel::new(RateLaw::new(3e-5, 0.0).unwrap());
        let cdf = model.build_cdf(0.1, 0.100001, &flat()).unwrap();
        assert_eq!(cdf.len(), 2);
        assert_eq!(cdf.cdf(), &[0.0, 1.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn test_cdf_monotone_and_normalised(
                power in -2.0f64..4.0,
                z_min in 0.0f64..0.5,
                width in 0.01f64..0.5,
            ) {
                let cdf = RedshiftRateModel::new(RateLaw::new(3e-5, power).unwrap())
                    .with_step(1e-3)
                    .unwrap()
                    .build_cdf(z_min, z_min + width, &flat())
                    .unwrap();
                prop_assert_eq!(cdf.cdf()[0], 0.0);
                prop_assert_eq!(*cdf.cdf().last().unwrap(), 1.0);
                prop_assert!(cdf.cdf().windows(2).all(|w| w[1] >= w[0]));
                prop_assert!(cdf.z().windows(2).all(|w| w[1] > w[0]));
            }

            #[test]
            fn test_rate_at_z0_any_power(rate in 0.0f64..1e-3, power in -5.0f64..5.0) {
                let law = RateLaw::new(rate, power).unwrap();
                prop_assert_eq!(law.rate(0.0), rate);
            }
        }
    }
}
