//! Application Configuration
//!
//! Built-in defaults overlaid by an optional `water-quality.toml` in the
//! working directory.

use config::{Config, ConfigError, File};
use inference_engine::PredictorConfig;
use reference_data::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "water-quality.toml";

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen address
    pub bind_addr: String,
    /// Fixed local reference dataset
    pub dataset_path: PathBuf,
    /// Largest accepted dataset upload (bytes)
    pub max_upload_bytes: usize,
    /// Reuse trained models for identical datasets
    pub cache_models: bool,
    /// Maximum cached model sets
    pub cache_capacity: usize,
    /// Seed for the random forest
    pub seed: u64,
    /// Random forest size
    pub n_trees: usize,
    /// Minimum log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            dataset_path: PathBuf::from(reference_data::DEFAULT_DATASET_PATH),
            max_upload_bytes: 10 * 1024 * 1024,
            cache_models: false,
            cache_capacity: 8,
            seed: 42,
            n_trees: 100,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load defaults plus [`DEFAULT_CONFIG_FILE`] if it exists
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load defaults plus the given file if it exists
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).required(false))
            .build()?
            .try_deserialize()
    }

    /// Dataset loader settings
    pub fn loader(&self) -> LoaderConfig {
        LoaderConfig {
            local_path: self.dataset_path.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    /// Predictor settings
    pub fn predictor(&self) -> PredictorConfig {
        PredictorConfig {
            seed: self.seed,
            n_trees: self.n_trees,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("water-quality-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("absent-{}.toml", uuid::Uuid::new_v4()));
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.dataset_path, PathBuf::from("processed_data.csv"));
        assert_eq!(config.seed, 42);
        assert!(!config.cache_models);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = scratch_file("bind_addr = \"127.0.0.1:9000\"\ncache_models = true\nn_trees = 20\n");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert!(config.cache_models);
        assert_eq!(config.n_trees, 20);
        assert_eq!(config.predictor().n_trees, 20);
        assert_eq!(config.log_level, "info");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let path = scratch_file("n_trees = \"many\"\n");
        assert!(AppConfig::load_from(&path).is_err());
        std::fs::remove_file(path).unwrap();
    }
}
