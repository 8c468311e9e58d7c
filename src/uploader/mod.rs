//! Upload coordination.
//!
//! The [`Uploader`] owns the end-to-end sequence of one run: discover the
//! files, fill and close the job queue, spawn the worker pool, drain one
//! result per job, and aggregate failures into the run's outcome. The whole
//! run sits under a configurable deadline after which in-flight work is
//! abandoned.
//!
//! ## Run phases
//!
//! ```text
//! Discovering ──▶ Dispatching ──▶ Draining ──▶ Done
//!      │               │              │
//!      │ discovery     │ queue filled │ one result per job,
//!      │ error: fatal  │ then closed  │ failures counted
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use crate::cloud::client::create_s3_client;
use crate::cloud::store::{ObjectStore, S3ObjectStore};
use crate::config::Config;
use crate::discovery;
use crate::progress::{ConsoleProgress, ProgressObserver};

mod worker;

pub use worker::{UploadJob, UploadResult};
use worker::{run_worker, WorkerContext};

/// Aggregate state of one finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    fn empty() -> Self {
        RunSummary {
            total: 0,
            succeeded: 0,
            failed: 0,
        }
    }
}

/// Coordinates one upload run against a storage port.
pub struct Uploader {
    config: Config,
    store: Arc<dyn ObjectStore>,
    progress: Arc<dyn ProgressObserver>,
}

impl Uploader {
    /// Production wiring: S3-backed store and a console progress bar.
    ///
    /// The config must already be validated.
    pub fn new(config: Config) -> Result<Self> {
        let client = create_s3_client(
            config.region.as_deref(),
            config.aws_profile.as_deref(),
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
        )?;
        let store = Arc::new(S3ObjectStore::new(client, &config.bucket_name));

        Ok(Self::with_store(config, store, Arc::new(ConsoleProgress::new())))
    }

    /// Wire the coordinator to an arbitrary storage port and observer.
    pub fn with_store(
        config: Config,
        store: Arc<dyn ObjectStore>,
        progress: Arc<dyn ProgressObserver>,
    ) -> Self {
        Uploader {
            config,
            store,
            progress,
        }
    }

    /// Run the upload to completion, bounded by the configured deadline.
    ///
    /// Returns the run summary on full success (a zero-file run is a
    /// success), or an error when configuration-phase or discovery-phase
    /// work fails, when any file fails to upload, or when the deadline
    /// elapses.
    pub async fn run(&self) -> Result<RunSummary> {
        let deadline = self.config.deadline();

        match tokio::time::timeout(deadline, self.run_inner()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "upload run abandoned: deadline of {:?} exceeded",
                deadline
            )),
        }
    }

    async fn run_inner(&self) -> Result<RunSummary> {
        info!(
            "Starting upload: {} -> s3://{}/{}",
            self.config.local_path.display(),
            self.config.bucket_name,
            self.config.s3_prefix
        );

        // Discovering
        let files = discovery::discover(&self.config.local_path, &self.config.pattern)
            .context("Failed to find files")?;

        if files.is_empty() {
            info!("No files to upload");
            return Ok(RunSummary::empty());
        }

        let total = files.len();
        info!("Found {} files to upload", total);

        // Dispatching: fill the queue and close it before any worker
        // starts, so workers drain the remainder and exit.
        let (job_tx, job_rx) = crossbeam::channel::bounded(total);
        for path in files {
            job_tx
                .send(UploadJob { path })
                .map_err(|_| anyhow!("job queue closed during dispatch"))?;
        }
        drop(job_tx);

        self.progress.begin(total as u64);

        let (result_tx, mut result_rx) = tokio::sync::mpsc::channel(total);

        let ctx = Arc::new(WorkerContext {
            store: Arc::clone(&self.store),
            root: self.config.local_path.clone(),
            prefix: self.config.s3_prefix.clone(),
            region: self.config.region.clone().unwrap_or_default(),
            progress: Arc::clone(&self.progress),
        });

        // Draining: exactly N workers for the lifetime of the run.
        let width = self.config.max_concurrency.max(1);
        let mut workers = Vec::with_capacity(width);
        for _ in 0..width {
            workers.push(tokio::spawn(run_worker(
                Arc::clone(&ctx),
                job_rx.clone(),
                result_tx.clone(),
            )));
        }
        drop(result_tx);
        drop(job_rx);

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        while let Some(result) = result_rx.recv().await {
            if result.is_ok() {
                succeeded += 1;
            } else {
                failed += 1;
            }
        }

        futures::future::join_all(workers).await;
        self.progress.finish();

        if failed > 0 {
            warn!(
                "Upload completed with errors: {} of {} files failed",
                failed, total
            );
            return Err(anyhow!("failed to upload {} files", failed));
        }

        info!("Upload completed successfully: {} files", total);
        Ok(RunSummary {
            total,
            succeeded,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingStore {
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for CountingStore {
        async fn put(&self, _key: &str, _body: Vec<u8>) -> Result<(), crate::cloud::store::StoreError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_config(root: &std::path::Path) -> Config {
        let mut config: Config = serde_json::from_str("{}").unwrap();
        config.bucket_name = "test-bucket".to_string();
        config.local_path = root.to_path_buf();
        config.s3_prefix = "runs".to_string();
        config.apply_defaults();
        config
    }

    #[tokio::test]
    async fn test_zero_files_is_noop_success() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(CountingStore {
            puts: AtomicUsize::new(0),
        });

        let uploader =
            Uploader::with_store(test_config(temp_dir.path()), store.clone(), Arc::new(NullProgress));
        let summary = uploader.run().await.unwrap();

        assert_eq!(summary, RunSummary::empty());
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_discovery_failure_is_fatal_before_dispatch() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(temp_dir.path());
        config.pattern = "[unclosed".to_string();

        let store = Arc::new(CountingStore {
            puts: AtomicUsize::new(0),
        });
        let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

        let err = uploader.run().await.unwrap_err();
        assert!(err.to_string().contains("Failed to find files"));
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_width_floor_of_one() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("only.txt"), b"x").unwrap();

        let mut config = test_config(temp_dir.path());
        config.max_concurrency = 1;

        let store = Arc::new(CountingStore {
            puts: AtomicUsize::new(0),
        });
        let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

        let summary = uploader.run().await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(store.puts.load(Ordering::SeqCst), 1);
    }
}
