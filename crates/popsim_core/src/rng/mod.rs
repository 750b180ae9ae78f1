//! # Random Number Generation Infrastructure
//!
//! This module provides the seeded random number generation used by every
//! sampling step of the population generator.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: Every generator is constructed from an explicit seed;
//!   there is no global or thread-local fallback
//! - **Independence**: Correlated quantities draw from separate sub-generators
//!   whose seeds come from a single [`SeedDeriver`]
//! - **Efficiency**: Zero-allocation batch operations via `&mut [f64]` slices
//!
//! ## Module Structure
//!
//! - [`prng`]: Pseudo-random number generator wrapper with seed management
//! - [`seeds`]: Expansion of one root seed into independent sub-seeds
//!
//! ## Usage Example
//!
//! ```rust
//! use popsim_core::rng::{SeedDeriver, SimRng};
//!
//! // One root seed, several independent streams
//! let seeds = SeedDeriver::derive(12345, 2);
//! let mut coords = SimRng::from_seed(seeds[0]);
//! let mut velocities = SimRng::from_seed(seeds[1]);
//!
//! let u = coords.gen_uniform();
//! let v = velocities.gen_normal_with(0.0, 300.0);
//! assert!((0.0..1.0).contains(&u));
//! assert!(v.is_finite());
//! ```

pub mod prng;
pub mod seeds;

pub use prng::SimRng;
pub use seeds::{SeedDeriver, SEED_HIGH, SEED_LOW};
