//! Upload workers: the bounded pool's per-job execution loop.
//!
//! Each worker repeatedly takes the next job from the shared queue until the
//! queue is closed and drained. Per job it reads the file, derives its
//! object key, invokes the storage port, and reports exactly one
//! [`UploadResult`] — failures included. One job's failure never aborts the
//! pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::Receiver;
use log::{debug, error};
use tokio::sync::mpsc::Sender;

use crate::cloud::keys::derive_key;
use crate::cloud::store::{ErrorClass, ObjectStore, StoreError};
use crate::progress::ProgressObserver;

/// One file's upload task. Immutable once enqueued; consumed exactly once
/// by one worker.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub path: PathBuf,
}

/// Outcome of one job, produced by a worker and consumed exactly once by
/// the coordinator.
#[derive(Debug)]
pub struct UploadResult {
    pub path: PathBuf,
    pub key: String,
    pub elapsed: Duration,
    pub error: Option<StoreError>,
}

impl UploadResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a worker needs beyond the job itself. Shared read-only across
/// the pool.
pub(crate) struct WorkerContext {
    pub store: Arc<dyn ObjectStore>,
    pub root: PathBuf,
    pub prefix: String,
    pub region: String,
    pub progress: Arc<dyn ProgressObserver>,
}

/// Worker loop: take jobs until the queue is closed and drained, then exit.
pub(crate) async fn run_worker(
    ctx: Arc<WorkerContext>,
    jobs: Receiver<UploadJob>,
    results: Sender<UploadResult>,
) {
    // The queue is filled and closed before any worker is spawned, so recv
    // never blocks the executor: it yields a job or disconnects.
    while let Ok(job) = jobs.recv() {
        let started = Instant::now();
        let key = derive_key(&ctx.root, &ctx.prefix, &job.path);
        let outcome = upload_one(ctx.store.as_ref(), &key, &job.path).await;
        let elapsed = started.elapsed();

        match &outcome {
            Ok(()) => {
                debug!(
                    "Uploaded {} as {} in {:?}",
                    job.path.display(),
                    key,
                    elapsed
                );
            }
            Err(e) => {
                error!("Upload failed for {}: {}", job.path.display(), e);
                if e.class() == ErrorClass::RegionMismatch {
                    error!(
                        "Region mismatch for key {}: configured region '{}' does not match the bucket",
                        key, ctx.region
                    );
                }
            }
        }

        let result = UploadResult {
            path: job.path,
            key,
            elapsed,
            error: outcome.err(),
        };

        // A closed result channel means the run was abandoned; nothing left
        // to report to.
        if results.send(result).await.is_err() {
            return;
        }

        ctx.progress.unit_done();
    }
}

/// Read the file and push it through the storage port. A local read failure
/// is reported exactly like a remote put failure.
async fn upload_one(store: &dyn ObjectStore, key: &str, path: &Path) -> Result<(), StoreError> {
    let body = tokio::fs::read(path).await.map_err(StoreError::local)?;
    store.put(key, body).await
}
