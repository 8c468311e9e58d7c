//! Configuration loading and validation.
//!
//! The uploader reads a JSON configuration file (by convention
//! `config.json` in the working directory) describing the source tree, the
//! destination bucket, credentials, and tuning knobs. Defaults are applied
//! at load time; [`Config::validate`] must pass before the engine starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_PATTERN, DEFAULT_REGION, RUN_DEADLINE_SECS, WORKERS_PER_CPU};

/// Configuration for one upload run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// AWS named profile to pull credentials from
    #[serde(default)]
    pub aws_profile: Option<String>,

    /// Static access key; used together with `secret_key`
    #[serde(default)]
    pub access_key: Option<String>,

    /// Static secret key; used together with `access_key`
    #[serde(default)]
    pub secret_key: Option<String>,

    /// AWS region; defaults to us-east-1 during validation
    #[serde(default)]
    pub region: Option<String>,

    /// Destination bucket (required)
    #[serde(default)]
    pub bucket_name: String,

    /// Key prefix prepended to every uploaded object
    #[serde(default)]
    pub s3_prefix: String,

    /// Root of the local tree to upload (required)
    #[serde(default)]
    pub local_path: PathBuf,

    /// Shell glob applied to file base names
    #[serde(default)]
    pub pattern: String,

    /// Worker pool width; 0 means "pick a default"
    #[serde(default)]
    pub max_concurrency: usize,

    /// Log level: debug, info, warn, error
    #[serde(default)]
    pub log_level: String,

    /// Upper bound on the whole run, in seconds
    #[serde(default)]
    pub deadline_secs: u64,
}

impl Config {
    /// Load configuration from a JSON file and apply defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&content)
            .context("Failed to parse JSON config")?;

        config.apply_defaults();
        Ok(config)
    }

    /// Fill in defaults for optional fields left unset.
    pub fn apply_defaults(&mut self) {
        if self.pattern.is_empty() {
            self.pattern = DEFAULT_PATTERN.to_string();
        }

        if self.max_concurrency == 0 {
            self.max_concurrency = num_cpus::get() * WORKERS_PER_CPU;
        }

        if self.log_level.is_empty() {
            self.log_level = DEFAULT_LOG_LEVEL.to_string();
        }

        if self.deadline_secs == 0 {
            self.deadline_secs = RUN_DEADLINE_SECS;
        }
    }

    /// Validate required fields before any upload starts.
    ///
    /// Checks that the bucket is named and that the source root exists and
    /// is a directory. An absent region falls back to the default.
    pub fn validate(&mut self) -> Result<()> {
        if self.bucket_name.is_empty() {
            bail!("bucket_name is required in config");
        }

        if self.local_path.as_os_str().is_empty() {
            bail!("local_path is required in config");
        }

        let meta = fs::metadata(&self.local_path).context(format!(
            "local_path directory does not exist: {}",
            self.local_path.display()
        ))?;

        if !meta.is_dir() {
            bail!("local_path is not a directory: {}", self.local_path.display());
        }

        if self.region.as_deref().map_or(true, str::is_empty) {
            self.region = Some(DEFAULT_REGION.to_string());
        }

        Ok(())
    }

    /// The run deadline as a [`Duration`].
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}
