//! Coordinate transforms on the celestial sphere.

/// Rotation from equatorial (J2000) to galactic cartesian coordinates.
///
/// Rows are the galactic x (towards the centre), y (towards l = 90°) and
/// z (towards the north galactic pole) axes expressed in equatorial
/// coordinates.
const EQ_TO_GAL: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// Unit vector for a point at right ascension `ra` and declination `dec`.
///
/// # Example
///
/// ```
/// use popsim_core::sky::radec_to_cartesian;
///
/// let v = radec_to_cartesian(0.0, std::f64::consts::FRAC_PI_2);
/// assert!(v[2] > 0.999_999);
/// ```
#[inline]
pub fn radec_to_cartesian(ra: f64, dec: f64) -> [f64; 3] {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();
    [cos_dec * cos_ra, cos_dec * sin_ra, sin_dec]
}

/// Cosine of the angle between two unit vectors.
#[inline]
pub fn angular_cos(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Converts equatorial `(ra, dec)` to galactic `(l, b)`.
///
/// `l` is returned in `(-π, π]`, `b` in `[-π/2, π/2]`.
///
/// # Example
///
/// ```
/// use popsim_core::sky::equatorial_to_galactic;
///
/// // Galactic centre
/// let (l, b) = equatorial_to_galactic(266.405_f64.to_radians(), (-28.936_17_f64).to_radians());
/// assert!(l.abs() < 1e-4 && b.abs() < 1e-4);
/// ```
pub fn equatorial_to_galactic(ra: f64, dec: f64) -> (f64, f64) {
    let v = radec_to_cartesian(ra, dec);
    let g: [f64; 3] = [
        angular_cos(EQ_TO_GAL[0], v),
        angular_cos(EQ_TO_GAL[1], v),
        angular_cos(EQ_TO_GAL[2], v),
    ];
    let l = g[1].atan2(g[0]);
    let b = g[2].clamp(-1.0, 1.0).asin();
    (l, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cartesian_is_unit_vector() {
        for &(ra, dec) in &[(0.3, -1.1), (4.0, 0.2), (6.2, 1.5)] {
            let v = radec_to_cartesian(ra, dec);
            assert_abs_diff_eq!(angular_cos(v, v), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_angular_cos_orthogonal_axes() {
        let x = radec_to_cartesian(0.0, 0.0);
        let y = radec_to_cartesian(FRAC_PI_2, 0.0);
        let z = radec_to_cartesian(0.0, FRAC_PI_2);
        assert_abs_diff_eq!(angular_cos(x, y), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(angular_cos(x, z), 0.0, epsilon = 1e-15);
        let anti_x = radec_to_cartesian(PI, 0.0);
        assert_abs_diff_eq!(angular_cos(x, anti_x), -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_north_galactic_pole() {
        let (_, b) = equatorial_to_galactic(192.859_48_f64.to_radians(), 27.128_25_f64.to_radians());
        assert_abs_diff_eq!(b, FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn test_galactic_centre() {
        let (l, b) =
            equatorial_to_galactic(266.405_f64.to_radians(), (-28.936_17_f64).to_radians());
        assert_abs_diff_eq!(l, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_preserves_angles() {
        let (ra1, dec1) = (1.0, 0.4);
        let (ra2, dec2) = (2.5, -0.7);
        let (l1, b1) = equatorial_to_galactic(ra1, dec1);
        let (l2, b2) = equatorial_to_galactic(ra2, dec2);
        let eq = angular_cos(radec_to_cartesian(ra1, dec1), radec_to_cartesian(ra2, dec2));
        let gal = angular_cos(radec_to_cartesian(l1, b1), radec_to_cartesian(l2, b2));
        assert_abs_diff_eq!(eq, gal, epsilon = 1e-9);
    }

    #[test]
    fn test_longitude_range() {
        for i in 0..36 {
            let (l, _) = equatorial_to_galactic(i as f64 * 0.17, 0.1);
            assert!(l > -PI && l <= PI);
        }
    }
}
