//! # s3-batch-upload
//!
//! A concurrent directory-tree uploader for Amazon S3.
//!
//! ## Overview
//!
//! s3-batch-upload walks a local directory tree, derives an S3 object key
//! for every file from its path relative to the tree root, and uploads the
//! files through a bounded pool of concurrent workers. Individual transfer
//! failures are counted and logged without aborting the run; the run as a
//! whole fails if any file could not be uploaded.
//!
//! ## Features
//!
//! - **Concurrent transfers**: fixed-width worker pool, default 2× CPU count
//! - **Glob filtering**: shell-style pattern applied to file base names
//! - **Key preservation**: relative paths become object keys under a prefix
//! - **Failure aggregation**: per-file errors never abort sibling uploads
//! - **Progress reporting**: pluggable observer, console progress bar built in
//! - **Run deadline**: the whole run is bounded by a configurable timeout
//!
//! ## Usage
//!
//! ```no_run
//! use s3_batch_upload::config::Config;
//! use s3_batch_upload::uploader::Uploader;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut config = Config::load(std::path::Path::new("config.json"))?;
//! config.validate()?;
//!
//! let uploader = Uploader::new(config)?;
//! let summary = uploader.run().await?;
//!
//! println!("uploaded {} files", summary.succeeded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Configuration loading, defaults, and validation
//! - [`discovery`]: Directory traversal and glob matching
//! - [`cloud`]: S3 client construction, key derivation, and the storage port
//! - [`progress`]: Progress-reporting port and console implementation
//! - [`uploader`]: Worker pool and upload coordinator
//! - [`constants`]: Application-wide defaults

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration loading, defaults, and validation
pub mod config;

/// Application constants and default values
pub mod constants;

/// Cloud storage integration: client construction, keys, storage port
pub mod cloud;

/// Directory traversal and glob-based file discovery
pub mod discovery;

/// Progress-reporting port and implementations
pub mod progress;

/// Worker pool and upload coordination
pub mod uploader;
