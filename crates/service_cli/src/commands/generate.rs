//! Generate command implementation
//!
//! Runs the population generator and writes the result as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use popsim_generator::Population;
use tracing::info;

use super::build_generator;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Output formats accepted by `--format`.
pub const FORMATS: &[&str] = &["json", "jsonl"];

/// Run the generate command
pub fn run(config: &CliConfig, output: Option<&Path>, format: &str, mw_ebv: Option<f64>) -> Result<()> {
    if !FORMATS.contains(&format) {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: {}",
            format,
            FORMATS.join(", ")
        )));
    }

    info!("Starting generation...");
    info!("  Objects: {}", config.run.count);
    info!("  Peak-time window: {:?}", config.run.time_range);
    info!("  Output format: {}", format);

    let generator = build_generator(config, mw_ebv)?;
    let population = generator.generate(&config.request())?;
    info!("  Root seed: {}", population.root_seed());

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_population(&population, format, &mut writer)?;
            writer.flush()?;
            info!("Wrote {} records to {}", population.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_population(&population, format, &mut writer)?;
            writer.flush()?;
        }
    }

    info!("Generation complete");
    Ok(())
}

/// Writes `population` in `format`.
///
/// `json` writes one document; `jsonl` writes the run header on the first
/// line and one record per following line.
pub fn write_population(population: &Population, format: &str, writer: &mut impl Write) -> Result<()> {
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut *writer, population)?;
            writeln!(writer)?;
        }
        "jsonl" => {
            serde_json::to_writer(
                &mut *writer,
                &serde_json::json!({
                    "root_seed": population.root_seed(),
                    "header": population.header(),
                }),
            )?;
            writeln!(writer)?;
            for record in population.records() {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: {}",
                other,
                FORMATS.join(", ")
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use popsim_generator::PopulationGenerator;

    const DOC: &str = r#"
        redshift_range = [0.01, 0.1]
        absolute_magnitude = -19.3

        [cosmology]
        H0 = 70.0
        Om0 = 0.3

        [model]
        name = "salt2"

        [shape_param_distributions]
        x1 = [0.0, 1.0]
        c = [0.0, 0.1]

        [run]
        count = 4
        root_seed = 42
    "#;

    fn population() -> Population {
        let config = CliConfig::from_toml_str(DOC).unwrap();
        PopulationGenerator::builder(config.generator.clone())
            .build()
            .unwrap()
            .generate(&config.request())
            .unwrap()
    }

    #[test]
    fn test_json_document() {
        let mut out = Vec::new();
        write_population(&population(), "json", &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["root_seed"], 42);
        assert_eq!(value["header"]["obj_type"], "SNIa");
        assert_eq!(value["records"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn test_json_lines() {
        let mut out = Vec::new();
        write_population(&population(), "jsonl", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);

        let head: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(head["header"]["root_seed"], 42);
        let row: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(row["zcos"].is_number());
        assert!(row["x1"].is_number());
    }

    #[test]
    fn test_unknown_format() {
        let mut out = Vec::new();
        assert!(matches!(
            write_population(&population(), "csv", &mut out),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
