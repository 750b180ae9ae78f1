//! popsim CLI - Command Line Population Generation
//!
//! This is the operational entry point for the popsim transient population
//! generator.
//!
//! # Commands
//!
//! - `popsim generate` - Generate a population and write it as JSON
//! - `popsim check` - Validate the configuration and print the run header
//!
//! # Configuration
//!
//! One TOML file holds the generator configuration and a `[run]` table.
//! `POPSIM_COUNT` and `POPSIM_ROOT_SEED` override the run settings and
//! `POPSIM_LOG` (or `RUST_LOG`) sets the log filter. Logs go to stderr so
//! stdout carries only generated data.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::CliConfig;

/// popsim transient population generator CLI
#[derive(Parser)]
#[command(name = "popsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "popsim.toml")]
    config: PathBuf,

    /// Uniform Milky Way E(B-V) used when dust is configured
    #[arg(long, global = true)]
    mw_ebv: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a population
    Generate {
        /// Number of objects (overrides run.count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Root seed (overrides run.root_seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, jsonl)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Validate the configuration and print the run header
    Check {
        /// Survey duration in days for the expected count
        #[arg(short, long)]
        days: Option<f64>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("POPSIM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut config = CliConfig::load(&cli.config)?.with_env_override()?;

    match cli.command {
        Commands::Generate {
            count,
            seed,
            output,
            format,
        } => {
            if let Some(count) = count {
                config.run.count = count;
            }
            if let Some(seed) = seed {
                config.run.root_seed = Some(seed);
            }
            config.validate()?;
            commands::generate::run(&config, output.as_deref(), &format, cli.mw_ebv)?;
        }
        Commands::Check { days } => commands::check::run(&config, days, cli.mw_ebv)?,
    }

    Ok(())
}
