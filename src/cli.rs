use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_CONFIG_FILE;

/// Command-line arguments for the s3-batch-upload tool.
///
/// The tool is configuration-file driven; the CLI only selects which file
/// to load and the logging verbosity.
#[derive(Parser, Debug)]
#[clap(name = "s3-batch-upload", about = "Concurrent directory-tree uploader for Amazon S3")]
pub struct Args {
    /// Path to the JSON configuration file
    #[clap(short = 'c', long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose logging (overrides the config file's log level)
    #[clap(short, long)]
    pub verbose: bool,
}
