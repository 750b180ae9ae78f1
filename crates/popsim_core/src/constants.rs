//! Physical constants and survey defaults.

/// Speed of light in km/s.
pub const C_LIGHT_KMS: f64 = 299_792.458;

/// Velocity of the Solar System relative to the CMB rest frame, in km/s.
pub const V_CMB: f64 = 369.82;

/// Galactic longitude of the CMB dipole apex, in degrees.
pub const L_CMB_DEG: f64 = 266.81;

/// Galactic latitude of the CMB dipole apex, in degrees.
pub const B_CMB_DEG: f64 = 48.253;

/// Volumetric rate used when none is configured, in objects · Mpc⁻³ · yr⁻¹.
pub const DEFAULT_RATE: f64 = 3e-5;

/// Days per Julian year, used to turn a yearly rate into a survey count.
pub const DAYS_PER_YEAR: f64 = 365.25;
