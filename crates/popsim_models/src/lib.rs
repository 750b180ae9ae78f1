//! # popsim_models (L2: Object Physics)
//!
//! Object-type parameter models and the light-curve source handle they drive.
//!
//! This crate provides:
//! - The [`ObjectParameterModel`](object::ObjectParameterModel) capability set and the
//!   closed [`ObjectModel`](object::ObjectModel) enum (one variant per object type)
//! - The Type Ia model: absolute-magnitude recipes, stretch and colour
//!   distributions, coherent scatter and wavelength-dependent scatter seeds
//! - [`SourceModel`](source::SourceModel): the light-curve source handle with
//!   settable parameters, effects and validity time bounds
//! - Milky Way dust laws and scatter models
//! - The run [`Header`](header::Header)
//!
//! ## Design Principles
//!
//! - **Enum-based object models** for static dispatch; the orchestrator never
//!   branches on a type name
//! - **Explicit generators**: every sampling method takes a seeded
//!   [`SimRng`](popsim_core::rng::SimRng), there is no global fallback
//! - **Column-oriented output**: per-object parameters come back as named
//!   columns of equal length

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod distributions;
pub mod dust;
pub mod error;
pub mod header;
pub mod magnitude;
pub mod object;
pub mod params;
pub mod scatter;
pub mod source;

pub use error::ModelError;
pub use object::{ObjectModel, ObjectModelConfig, ObjectParameterModel};
