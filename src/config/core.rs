//! Core configuration structure and builder for the forest predictor.
//!
//! A configuration covers arena sizing, batch prediction parallelism and
//! logging verbosity. It can be built programmatically, loaded from a
//! `.json` or `.toml` file, or read from `FOREST_*` environment variables.

use crate::core::constants::*;
use crate::core::error::{ForestError, Result};
use crate::core::types::*;
use crate::config_error;
use crate::prediction::PredictionConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`Config::num_threads`].
pub const ENV_NUM_THREADS: &str = "FOREST_NUM_THREADS";
/// Environment variable overriding [`Config::parallel_min_rows`].
pub const ENV_PARALLEL_MIN_ROWS: &str = "FOREST_PARALLEL_MIN_ROWS";
/// Environment variable overriding [`Config::node_capacity`].
pub const ENV_NODE_CAPACITY: &str = "FOREST_NODE_CAPACITY";
/// Environment variable overriding [`Config::verbosity`].
pub const ENV_VERBOSITY: &str = "FOREST_VERBOSITY";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity of the node arena
    pub node_capacity: usize,
    /// Number of threads for batch prediction (0 = all cores)
    pub num_threads: usize,
    /// Minimum batch size before prediction runs in parallel
    pub parallel_min_rows: usize,
    /// Logging verbosity
    pub verbosity: VerbosityLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_capacity: DEFAULT_NODE_CAPACITY,
            num_threads: DEFAULT_NUM_THREADS,
            parallel_min_rows: DEFAULT_PARALLEL_MIN_ROWS,
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.parallel_min_rows == 0 {
            return Err(ForestError::invalid_parameter(
                "parallel_min_rows",
                self.parallel_min_rows.to_string(),
                "must be at least 1",
            ));
        }

        let cores = num_cpus::get();
        if self.num_threads > cores * 4 {
            log::warn!(
                "num_threads ({}) is much larger than available CPU cores ({})",
                self.num_threads,
                cores
            );
        }

        Ok(())
    }

    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error!("Failed to read config file: {}", e))?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| config_error!("Failed to parse JSON config: {}", e))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| config_error!("Failed to parse TOML config: {}", e))?,
            _ => {
                return Err(ForestError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => {
                return Err(ForestError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| config_error!("Failed to write config file: {}", e))?;

        Ok(())
    }

    /// Load configuration from `FOREST_*` environment variables
    pub fn load_from_environment() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from defaults plus the variables `lookup` returns
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(val) = lookup(ENV_NUM_THREADS) {
            config.num_threads = val
                .trim()
                .parse()
                .map_err(|_| ForestError::config(format!("Invalid {}", ENV_NUM_THREADS)))?;
        }

        if let Some(val) = lookup(ENV_PARALLEL_MIN_ROWS) {
            config.parallel_min_rows = val
                .trim()
                .parse()
                .map_err(|_| ForestError::config(format!("Invalid {}", ENV_PARALLEL_MIN_ROWS)))?;
        }

        if let Some(val) = lookup(ENV_NODE_CAPACITY) {
            config.node_capacity = val
                .trim()
                .parse()
                .map_err(|_| ForestError::config(format!("Invalid {}", ENV_NODE_CAPACITY)))?;
        }

        if let Some(val) = lookup(ENV_VERBOSITY) {
            config.verbosity = VerbosityLevel::parse(&val)
                .ok_or_else(|| ForestError::config(format!("Invalid {}", ENV_VERBOSITY)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve the number of prediction threads (0 means all cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Batch prediction settings carried by this configuration
    pub fn prediction_config(&self) -> PredictionConfig {
        PredictionConfig::new()
            .with_num_threads(self.num_threads)
            .with_parallel_min_rows(self.parallel_min_rows)
    }
}

/// Builder for [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the initial node arena capacity
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.config.node_capacity = capacity;
        self
    }

    /// Set the number of prediction threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the minimum batch size for parallel prediction
    pub fn parallel_min_rows(mut self, rows: usize) -> Self {
        if rows == 0 {
            self.validation_errors
                .push("parallel_min_rows must be at least 1".to_string());
        }
        self.config.parallel_min_rows = rows;
        self
    }

    /// Set the logging verbosity
    pub fn verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(ForestError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.node_capacity, 0);
        assert_eq!(config.num_threads, 0);
        assert_eq!(config.parallel_min_rows, DEFAULT_PARALLEL_MIN_ROWS);
        assert_eq!(config.verbosity, VerbosityLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.parallel_min_rows = 0;
        assert!(matches!(config.validate(), Err(ForestError::InvalidParameter { .. })));
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .node_capacity(128)
            .num_threads(2)
            .parallel_min_rows(16)
            .verbosity(VerbosityLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.node_capacity, 128);
        assert_eq!(config.effective_num_threads(), 2);
        assert_eq!(config.prediction_config().parallel_min_rows, 16);
        assert_eq!(config.verbosity, VerbosityLevel::Debug);
    }

    #[test]
    fn test_config_builder_validation() {
        let result = ConfigBuilder::new().parallel_min_rows(0).build();
        assert!(matches!(result, Err(ForestError::Config { .. })));
    }

    #[test]
    fn test_effective_num_threads_uses_all_cores() {
        assert_eq!(Config::default().effective_num_threads(), num_cpus::get());
    }

    #[test]
    fn test_environment_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_NUM_THREADS, "3"),
            (ENV_PARALLEL_MIN_ROWS, " 64 "),
            (ENV_VERBOSITY, "warning"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.num_threads, 3);
        assert_eq!(config.parallel_min_rows, 64);
        assert_eq!(config.node_capacity, DEFAULT_NODE_CAPACITY);
        assert_eq!(config.verbosity, VerbosityLevel::Warning);
    }

    #[test]
    fn test_environment_lookup_rejects_garbage() {
        let result = Config::from_lookup(|key| (key == ENV_NODE_CAPACITY).then(|| "lots".to_string()));
        assert!(matches!(result, Err(ForestError::Config { .. })));

        let result = Config::from_lookup(|key| (key == ENV_PARALLEL_MIN_ROWS).then(|| "0".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new().num_threads(4).node_capacity(10).build().unwrap();

        for name in ["forest.json", "forest.toml"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            assert_eq!(Config::load_from_file(&path).unwrap(), config);
        }

        assert!(config.save_to_file(dir.path().join("forest.yaml")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "num_threads = 2\nverbosity = \"debug\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.num_threads, 2);
        assert_eq!(config.verbosity, VerbosityLevel::Debug);
        assert_eq!(config.parallel_min_rows, DEFAULT_PARALLEL_MIN_ROWS);
    }
}
