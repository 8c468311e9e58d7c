//! Global constants for s3-batch-upload.
//!
//! This module centralizes default values so configuration changes stay in
//! one place.

/// Default configuration file name, resolved in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default glob pattern (match every file)
pub const DEFAULT_PATTERN: &str = "*";

/// Default AWS region when the config omits one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Concurrency default is this many workers per available CPU
pub const WORKERS_PER_CPU: usize = 2;

/// Upper bound on a whole upload run (24 hours)
pub const RUN_DEADLINE_SECS: u64 = 24 * 60 * 60;
