//! CLI configuration: the generator document plus a `[run]` table.
//!
//! ```toml
//! [run]
//! count = 1000
//! time_range = [59000.0, 59365.0]
//! root_seed = 42
//! ```
//!
//! `POPSIM_COUNT` and `POPSIM_ROOT_SEED` override the `[run]` values.

use std::path::Path;

use popsim_generator::{GeneratorConfig, PopulationRequest};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Run settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Objects to generate
    #[serde(default = "default_count")]
    pub count: usize,

    /// Peak-time window in days
    #[serde(default = "default_time_range")]
    pub time_range: [f64; 2],

    /// Root seed; falls back to the generator's `root_seed`
    pub root_seed: Option<u64>,
}

fn default_count() -> usize {
    100
}

fn default_time_range() -> [f64; 2] {
    [0.0, 365.25]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            time_range: default_time_range(),
            root_seed: None,
        }
    }
}

#[derive(Deserialize)]
struct RunDocument {
    #[serde(default)]
    run: RunConfig,
}

/// Generator and run settings read from one file.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Generator configuration
    pub generator: GeneratorConfig,
    /// Run settings
    pub run: RunConfig,
}

impl CliConfig {
    /// Parses both tables from one TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let generator = GeneratorConfig::from_toml_str(content)?;
        let document: RunDocument =
            toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Self {
            generator,
            run: document.run,
        })
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Applies environment variable overrides.
    pub fn with_env_override(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(count) = lookup("POPSIM_COUNT") {
            self.run.count = count.trim().parse().map_err(|_| {
                CliError::InvalidArgument(format!("POPSIM_COUNT must be an integer, got '{}'", count))
            })?;
        }

        if let Some(seed) = lookup("POPSIM_ROOT_SEED") {
            let seed = seed.trim().parse().map_err(|_| {
                CliError::InvalidArgument(format!(
                    "POPSIM_ROOT_SEED must be an unsigned integer, got '{}'",
                    seed
                ))
            })?;
            self.run.root_seed = Some(seed);
        }

        Ok(self)
    }

    /// Validates both tables.
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        let mut errors = Vec::new();
        if self.run.count == 0 {
            errors.push("run.count must be greater than 0".to_string());
        }
        let [t_min, t_max] = self.run.time_range;
        if !(t_min.is_finite() && t_max.is_finite() && t_min <= t_max) {
            errors.push(format!(
                "run.time_range [{}, {}] must be finite and ordered",
                t_min, t_max
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CliError::Config(errors.join("; ")))
        }
    }

    /// Generation request for the run settings.
    pub fn request(&self) -> PopulationRequest {
        let [t_min, t_max] = self.run.time_range;
        let request = PopulationRequest::new(self.run.count, (t_min, t_max));
        match self.run.root_seed {
            Some(seed) => request.with_seed(seed),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DOC: &str = r#"
        redshift_range = [0.01, 0.1]
        absolute_magnitude = "jla"

        [cosmology]
        H0 = 70.0
        Om0 = 0.3

        [model]
        name = "salt2"

        [shape_param_distributions]
        x1 = [0.0, 1.0]
        c = [0.0, 0.1]

        [run]
        count = 12
        time_range = [59000.0, 59100.0]
    "#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_both_tables() {
        let config = CliConfig::from_toml_str(DOC).unwrap();
        assert_eq!(config.run.count, 12);
        assert_eq!(config.run.time_range, [59_000.0, 59_100.0]);
        assert_eq!(config.generator.model.name, "salt2");
        config.validate().unwrap();
    }

    #[test]
    fn test_run_table_is_optional() {
        let doc = DOC.split("[run]").next().unwrap();
        let config = CliConfig::from_toml_str(doc).unwrap();
        assert_eq!(config.run, RunConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = CliConfig::from_toml_str(DOC)
            .unwrap()
            .apply_overrides(env(&[("POPSIM_COUNT", "5"), ("POPSIM_ROOT_SEED", " 42 ")]))
            .unwrap();
        assert_eq!(config.run.count, 5);
        assert_eq!(config.run.root_seed, Some(42));

        let request = config.request();
        assert_eq!(request.count(), 5);
        assert_eq!(request.root_seed(), Some(42));
        assert_eq!(request.time_range(), (59_000.0, 59_100.0));
    }

    #[test]
    fn test_bad_env_value() {
        let result = CliConfig::from_toml_str(DOC)
            .unwrap()
            .apply_overrides(env(&[("POPSIM_ROOT_SEED", "-1")]));
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_count_rejected() {
        let config = CliConfig::from_toml_str(DOC)
            .unwrap()
            .apply_overrides(env(&[("POPSIM_COUNT", "0")]))
            .unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CliConfig::load(Path::new("/nonexistent/popsim.toml")),
            Err(CliError::FileNotFound(_))
        ));
    }
}
