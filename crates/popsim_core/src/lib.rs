//! # popsim_core: Numerical Foundation for Transient Population Simulation
//!
//! ## Layer 1 (Foundation) Role
//!
//! popsim_core is the bottom layer of the workspace, providing:
//! - Physical constants (`constants`)
//! - Error types: `InterpolationError`, `CosmologyError`, `FootprintError` (`types::error`)
//! - Piecewise linear interpolation and quadrature (`math`)
//! - Cosmological distances: `Cosmology`, `LambdaCdm` (`cosmology`)
//! - Sky geometry: cartesian and galactic transforms, `Footprint` (`sky`)
//! - Seeded random number generation: `SimRng`, `SeedDeriver` (`rng`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other popsim_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - rand / rand_distr: Seeded PRNG and normal variates
//! - thiserror: Structured errors
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use popsim_core::cosmology::{Cosmology, LambdaCdm};
//! use popsim_core::rng::SeedDeriver;
//!
//! let cosmo = LambdaCdm::flat(70.0, 0.3).unwrap();
//! let d = cosmo.comoving_distance(0.1);
//! assert!(d > 400.0 && d < 430.0);
//!
//! let seeds = SeedDeriver::derive(42, 3);
//! assert_eq!(seeds.len(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for footprints and cosmology parameters

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod constants;
pub mod cosmology;
pub mod math;
pub mod rng;
pub mod sky;
pub mod types;
