//! CLI error types.

use popsim_generator::GeneratorError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Command-line or environment value is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Run settings are invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generator failure.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialised.
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
