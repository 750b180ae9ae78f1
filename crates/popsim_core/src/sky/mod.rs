//! Sky geometry.
//!
//! - [`coords`]: unit vectors, angular separations and the equatorial → galactic rotation
//! - [`footprint`]: immutable survey footprint polygon used for membership tests
//!
//! All angles are in radians unless a function name says otherwise.

pub mod coords;
pub mod footprint;

pub use coords::{angular_cos, equatorial_to_galactic, radec_to_cartesian};
pub use footprint::Footprint;
