//! Redshift frame corrections.
//!
//! Observed redshift composes three multiplicative factors:
//!
//! ```text
//! 1 + z_obs = (1 + z_cos) · (1 + z_2cmb) · (1 + v_pec / c)
//! ```

use popsim_core::constants::{B_CMB_DEG, C_LIGHT_KMS, L_CMB_DEG, V_CMB};
use popsim_core::sky::equatorial_to_galactic;

/// Heliocentric to CMB frame correction for the Solar System dipole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCorrector {
    v_cmb: f64,
    l_cmb: f64,
    b_cmb: f64,
}

impl Default for FrameCorrector {
    fn default() -> Self {
        Self::new(V_CMB, L_CMB_DEG, B_CMB_DEG)
    }
}

impl FrameCorrector {
    /// Creates a corrector from the dipole speed (km/s) and apex galactic
    /// coordinates in degrees.
    pub fn new(v_cmb: f64, l_cmb_deg: f64, b_cmb_deg: f64) -> Self {
        Self {
            v_cmb,
            l_cmb: l_cmb_deg.to_radians(),
            b_cmb: b_cmb_deg.to_radians(),
        }
    }

    /// Dipole speed in km/s.
    #[inline]
    pub fn v_cmb(&self) -> f64 {
        self.v_cmb
    }

    /// Apex `(l, b)` in radians.
    #[inline]
    pub fn apex(&self) -> (f64, f64) {
        (self.l_cmb, self.b_cmb)
    }

    /// `z_2cmb` for a source at equatorial `(ra, dec)` in radians.
    pub fn z_to_cmb(&self, ra: f64, dec: f64) -> f64 {
        let (l, b) = equatorial_to_galactic(ra, dec);
        let cos_sep =
            b.sin() * self.b_cmb.sin() + b.cos() * self.b_cmb.cos() * (l - self.l_cmb).cos();
        (1.0 - self.v_cmb * cos_sep / C_LIGHT_KMS) - 1.0
    }

    /// `z_2cmb` for each position.
    pub fn z_to_cmb_many(&self, ra: &[f64], dec: &[f64]) -> Vec<f64> {
        ra.iter()
            .zip(dec)
            .map(|(&r, &d)| self.z_to_cmb(r, d))
            .collect()
    }
}

/// Redshift equivalent of a line-of-sight velocity in km/s.
#[inline]
pub fn peculiar_redshift(vpec: f64) -> f64 {
    vpec / C_LIGHT_KMS
}

/// Observed redshift from its three components.
///
/// # Example
///
/// ```
/// use popsim_generator::frame::compose_observed_redshift;
///
/// let z = compose_observed_redshift(0.1, 0.001, -0.0002);
/// assert!((z - (1.1 * 1.001 * 0.9998 - 1.0)).abs() < 1e-15);
/// ```
#[inline]
pub fn compose_observed_redshift(zcos: f64, z2cmb: f64, zpec: f64) -> f64 {
    (1.0 + zcos) * (1.0 + z2cmb) * (1.0 + zpec) - 1.0
}
