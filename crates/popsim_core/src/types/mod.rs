//! Foundation types shared across layers.
//!
//! - [`InterpolationError`]: Errors from interpolation operations
//! - [`CosmologyError`]: Invalid cosmological parameters
//! - [`FootprintError`]: Invalid sky footprint polygons

pub mod error;

pub use error::{CosmologyError, FootprintError, InterpolationError};
