//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod generate;

use std::sync::Arc;

use popsim_generator::PopulationGenerator;
use tracing::info;

use crate::config::CliConfig;
use crate::error::Result;

/// Builds the generator, with a uniform reddening map when `mw_ebv` is given.
pub fn build_generator(config: &CliConfig, mw_ebv: Option<f64>) -> Result<PopulationGenerator> {
    let mut builder = PopulationGenerator::builder(config.generator.clone());
    if let Some(ebv) = mw_ebv {
        info!("  Uniform E(B-V): {}", ebv);
        builder = builder.dust_map(Arc::new(move |_ra: f64, _dec: f64| ebv));
    }
    Ok(builder.build()?)
}
