//! Check command implementation
//!
//! Validates the configuration, builds the generator and prints the run
//! header with the expected object count.

use std::io::{self, Write};

use popsim_generator::PopulationGenerator;
use tracing::info;

use super::build_generator;
use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig, days: Option<f64>, mw_ebv: Option<f64>) -> Result<()> {
    info!("Checking configuration...");
    config.validate()?;
    let generator = build_generator(config, mw_ebv)?;

    let [t_min, t_max] = config.run.time_range;
    let days = days.unwrap_or(t_max - t_min);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&generator, days, &mut out)?;
    out.flush()?;

    info!("Configuration OK");
    Ok(())
}

/// Writes the header entries and the expected count over `days`.
pub fn write_summary(generator: &PopulationGenerator, days: f64, out: &mut impl Write) -> Result<()> {
    for (key, value) in generator.header().iter() {
        writeln!(out, "{:<12} {}", key, value)?;
    }
    writeln!(out, "{:<12} {}", "cdf_points", generator.cdf().len())?;
    writeln!(
        out,
        "{:<12} {:.3} per year, {:.3} over {} days",
        "expected",
        generator.expected_count(365.25),
        generator.expected_count(days),
        days
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        redshift_range = [0.01, 0.05]
        absolute_magnitude = "jla"

        [cosmology]
        H0 = 70.0
        Om0 = 0.3

        [model]
        name = "salt3"

        [shape_param_distributions]
        x1 = "N21"
        c = [0.0, 0.1]

        [dust]
        model = "F99"
    "#;

    #[test]
    fn test_summary_lists_header() {
        let config = CliConfig::from_toml_str(DOC).unwrap();
        let generator = build_generator(&config, Some(0.03)).unwrap();
        let mut out = Vec::new();
        write_summary(&generator, 180.0, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("model_name   salt3"));
        assert!(text.contains("mw_mod       F99"));
        assert!(text.contains("dist_x1      N21"));
        assert!(text.contains("over 180 days"));
    }

    #[test]
    fn test_dust_without_ebv_fails() {
        let config = CliConfig::from_toml_str(DOC).unwrap();
        assert!(build_generator(&config, None).is_err());
    }
}
