//! Magnitude dipole across the sky.

use popsim_core::sky::{angular_cos, radec_to_cartesian};

use crate::error::GeneratorError;

/// Additive magnitude offset `ΔM = A + B · cos θ`, with `θ` the angle between
/// a source and the dipole axis.
///
/// # Example
///
/// ```
/// use popsim_generator::dipole::MagnitudeDipole;
///
/// let dip = MagnitudeDipole::new(0.0, 90.0, 0.01, 0.05).unwrap();
/// // At the pole the full amplitude applies
/// assert!((dip.delta_mag(0.0, std::f64::consts::FRAC_PI_2) - 0.06).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagnitudeDipole {
    axis: [f64; 3],
    ra_deg: f64,
    dec_deg: f64,
    a: f64,
    b: f64,
}

impl MagnitudeDipole {
    /// Creates a dipole from its axis `(ra, dec)` in degrees and amplitudes.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Config`] for non-finite inputs or a declination
    /// outside `[-90, 90]`.
    pub fn new(ra_deg: f64, dec_deg: f64, a: f64, b: f64) -> Result<Self, GeneratorError> {
        if ![ra_deg, dec_deg, a, b].iter().all(|v| v.is_finite()) {
            return Err(GeneratorError::Config(
                "dipole axis and amplitudes must be finite".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(GeneratorError::Config(format!(
                "dipole declination {} is outside [-90, 90]",
                dec_deg
            )));
        }
        Ok(Self {
            axis: radec_to_cartesian(ra_deg.to_radians(), dec_deg.to_radians()),
            ra_deg,
            dec_deg,
            a,
            b,
        })
    }

    /// Axis `(ra, dec)` in degrees.
    #[inline]
    pub fn axis_deg(&self) -> (f64, f64) {
        (self.ra_deg, self.dec_deg)
    }

    /// Monopole term.
    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Dipole amplitude.
    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Offset for a source at `(ra, dec)` in radians.
    pub fn delta_mag(&self, ra: f64, dec: f64) -> f64 {
        self.a + self.b * angular_cos(self.axis, radec_to_cartesian(ra, dec))
    }

    /// Offsets for each position.
    pub fn delta_mag_many(&self, ra: &[f64], dec: &[f64]) -> Vec<f64> {
        ra.iter()
            .zip(dec)
            .map(|(&r, &d)| self.delta_mag(r, d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axis_antiaxis_and_equator() {
        let dip = MagnitudeDipole::new(45.0, 30.0, 0.02, 0.1).unwrap();
        let (ra, dec) = (45f64.to_radians(), 30f64.to_radians());
        assert_abs_diff_eq!(dip.delta_mag(ra, dec), 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(
            dip.delta_mag(ra + std::f64::consts::PI, -dec),
            -0.08,
            epsilon = 1e-12
        );
        // 90° away along the same meridian
        assert_abs_diff_eq!(
            dip.delta_mag(ra, dec - std::f64::consts::FRAC_PI_2),
            0.02,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_bad_axis() {
        assert!(MagnitudeDipole::new(0.0, 91.0, 0.0, 0.1).is_err());
        assert!(MagnitudeDipole::new(f64::NAN, 0.0, 0.0, 0.1).is_err());
    }

    #[test]
    fn test_many_matches_single() {
        let dip = MagnitudeDipole::new(120.0, -10.0, 0.0, 0.3).unwrap();
        let ra = [0.1, 2.0, 4.5];
        let dec = [-0.5, 0.0, 1.2];
        let many = dip.delta_mag_many(&ra, &dec);
        for i in 0..3 {
            assert_eq!(many[i], dip.delta_mag(ra[i], dec[i]));
        }
    }
}
