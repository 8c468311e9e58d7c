use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use s3_batch_upload::cli::Args;
use s3_batch_upload::config::Config;
use s3_batch_upload::uploader::Uploader;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Load and validate configuration
    let mut config = Config::load(&args.config)?;
    config.validate()?;

    // Initialize logging
    initialize_logging(&config, args.verbose)?;

    info!("Configuration loaded from {}", args.config.display());
    info!("  Bucket:  {}", config.bucket_name);
    info!("  Prefix:  {}", config.s3_prefix);
    info!("  Region:  {}", config.region.as_deref().unwrap_or_default());
    info!("  Source:  {}", config.local_path.display());
    info!("  Pattern: {}", config.pattern);
    info!("  Workers: {}", config.max_concurrency);

    // Run the upload
    let uploader = Uploader::new(config)?;

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let summary = runtime.block_on(uploader.run())?;

    info!(
        "Done: {} files uploaded ({} total)",
        summary.succeeded, summary.total
    );
    Ok(())
}

/// Initialize logging at the config's level; --verbose forces debug.
fn initialize_logging(config: &Config, verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        match config.log_level.to_lowercase().as_str() {
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    };

    TermLogger::init(
        log_level,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}
