//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported and
//! accessible via absolute paths.

/// Test that math modules are accessible via absolute path.
#[test]
fn test_math_module_exports() {
    use popsim_core::math::interpolators::{Interpolator, LinearInterpolator};
    use popsim_core::math::quadrature::{gauss_legendre_5, simpson};

    let interp = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 2.0]).unwrap();
    assert_eq!(interp.interpolate(0.5).unwrap(), 1.0);

    let a = gauss_legendre_5(|x| x * x, 0.0, 1.0);
    let b = simpson(|x| x * x, 0.0, 1.0, 10);
    assert!((a - 1.0 / 3.0).abs() < 1e-12);
    assert!((b - 1.0 / 3.0).abs() < 1e-12);
}

/// Test that cosmology types are accessible via absolute path.
#[test]
fn test_cosmology_module_exports() {
    use popsim_core::cosmology::{Cosmology, LambdaCdm};

    let cosmo: Box<dyn Cosmology> = Box::new(LambdaCdm::flat(70.0, 0.3).unwrap());
    assert_eq!(cosmo.h0(), 70.0);
    assert_eq!(cosmo.comoving_distance(0.0), 0.0);
}

/// Test that sky geometry is accessible via absolute path.
#[test]
fn test_sky_module_exports() {
    use popsim_core::sky::{angular_cos, equatorial_to_galactic, radec_to_cartesian, Footprint};

    let v = radec_to_cartesian(0.3, -0.2);
    assert!((angular_cos(v, v) - 1.0).abs() < 1e-12);

    let (l, b) = equatorial_to_galactic(1.0, 0.5);
    assert!(l.is_finite() && b.is_finite());

    let fp = Footprint::new(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
    assert!(fp.contains(0.2, 0.2));
}

/// Test that RNG types are accessible via absolute path.
#[test]
fn test_rng_module_exports() {
    use popsim_core::rng::{SeedDeriver, SimRng, SEED_HIGH, SEED_LOW};

    let mut deriver = SeedDeriver::new(1);
    let mut rng: SimRng = deriver.next_rng();
    assert!((SEED_LOW..SEED_HIGH).contains(&rng.seed()));
    assert!(rng.gen_uniform() < 1.0);
}

/// Test that error types are accessible via absolute path.
#[test]
fn test_types_module_exports() {
    use popsim_core::types::error::{CosmologyError, FootprintError, InterpolationError};

    let e = CosmologyError::InvalidHubbleConstant(-1.0);
    assert!(format!("{}", e).contains("-1"));
    let e = FootprintError::TooFewVertices(1);
    assert!(format!("{}", e).contains('1'));
    let e = InterpolationError::InsufficientData { got: 1, need: 2 };
    assert!(format!("{}", e).contains('2'));
}

/// Test that constants are accessible via absolute path.
#[test]
fn test_constants_exports() {
    use popsim_core::constants::{B_CMB_DEG, C_LIGHT_KMS, DEFAULT_RATE, L_CMB_DEG, V_CMB};

    assert_eq!(C_LIGHT_KMS, 299_792.458);
    assert_eq!(V_CMB, 369.82);
    assert_eq!(L_CMB_DEG, 266.81);
    assert_eq!(B_CMB_DEG, 48.253);
    assert_eq!(DEFAULT_RATE, 3e-5);
}
