use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::parallel::resolve_workers;

/// Repository-local config file picked up from the working directory
pub const CONFIG_FILE: &str = "minibatch.toml";

/// Prefix for environment overrides, e.g. `MINIBATCH_THREAD_POOL_SIZE=8`
pub const ENV_PREFIX: &str = "MINIBATCH_";

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned for input files
    pub input_dir: PathBuf,
    /// Destination for processed files (not used by the pipeline yet)
    pub processed_dir: PathBuf,
    /// Destination for failed files (not used by the pipeline yet)
    pub error_dir: PathBuf,
    /// Files smaller than this are skipped
    pub min_size_bytes: u64,
    /// Worker threads (0 = one per CPU core)
    pub thread_pool_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            processed_dir: PathBuf::from("processed"),
            error_dir: PathBuf::from("error"),
            min_size_bytes: 1024,
            thread_pool_size: 4,
        }
    }
}

/// Values given on the command line; only the fields that are set override
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_pool_size: Option<usize>,
}

impl BatchConfig {
    /// Load the layered configuration.
    ///
    /// Priority (lowest first): built-in defaults, `minibatch.toml`, the
    /// custom file, `MINIBATCH_*` environment variables, CLI overrides.
    pub fn load(custom_config: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::from(Serialized::defaults(BatchConfig::default()))
            .merge(Toml::file(CONFIG_FILE));

        if let Some(path) = custom_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            } else {
                tracing::warn!("Config file {} not found, ignoring", path.display());
            }
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides));

        let config: BatchConfig = figment
            .extract()
            .context("Failed to load batch configuration")?;

        tracing::trace!("CONFIG LOAD: Final config = {:?}", config);
        Ok(config)
    }

    /// Effective number of worker threads, always at least one
    pub fn worker_count(&self) -> usize {
        resolve_workers(self.thread_pool_size)
    }
}
