//! Integration tests for the upload engine.
//!
//! These tests drive the full coordinator + worker pool against a mock
//! storage port, so no network or AWS credentials are involved.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tempfile::TempDir;

use s3_batch_upload::cloud::store::{ErrorClass, ObjectStore, StoreError};
use s3_batch_upload::config::Config;
use s3_batch_upload::progress::{NullProgress, ProgressObserver};
use s3_batch_upload::uploader::Uploader;

/// Mock storage port: records keys, fails a chosen subset, and can hang.
struct MockStore {
    keys: Mutex<Vec<String>>,
    fail_keys: HashSet<String>,
    hang: bool,
}

impl MockStore {
    fn new() -> Self {
        MockStore {
            keys: Mutex::new(Vec::new()),
            fail_keys: HashSet::new(),
            hang: false,
        }
    }

    fn failing(keys: &[&str]) -> Self {
        MockStore {
            keys: Mutex::new(Vec::new()),
            fail_keys: keys.iter().map(|k| k.to_string()).collect(),
            hang: false,
        }
    }

    fn hanging() -> Self {
        MockStore {
            keys: Mutex::new(Vec::new()),
            fail_keys: HashSet::new(),
            hang: true,
        }
    }

    fn recorded_keys(&self) -> Vec<String> {
        let mut keys = self.keys.lock().unwrap().clone();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put(&self, key: &str, _body: Vec<u8>) -> Result<(), StoreError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        self.keys.lock().unwrap().push(key.to_string());

        if self.fail_keys.contains(key) {
            Err(StoreError::new(
                ErrorClass::Permanent,
                anyhow!("injected failure for {}", key),
            ))
        } else {
            Ok(())
        }
    }
}

/// Progress observer that counts begin/unit/finish calls.
struct CountingProgress {
    total: AtomicU64,
    units: AtomicU64,
    finished: AtomicU64,
}

impl CountingProgress {
    fn new() -> Self {
        CountingProgress {
            total: AtomicU64::new(0),
            units: AtomicU64::new(0),
            finished: AtomicU64::new(0),
        }
    }
}

impl ProgressObserver for CountingProgress {
    fn begin(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn unit_done(&self) {
        self.units.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

fn test_config(root: &Path) -> Config {
    let mut config: Config = serde_json::from_str("{}").unwrap();
    config.bucket_name = "test-bucket".to_string();
    config.s3_prefix = "backup".to_string();
    config.local_path = root.to_path_buf();
    config.apply_defaults();
    config
}

fn populate_tree(root: &Path, count: usize) {
    for i in 0..count {
        std::fs::write(root.join(format!("file-{:02}.txt", i)), b"payload").unwrap();
    }
}

/// Every discovered file yields exactly one put, regardless of pool width.
#[tokio::test]
async fn test_all_files_uploaded_across_widths() {
    for width in [1usize, 2, 8] {
        let temp_dir = TempDir::new().unwrap();
        populate_tree(temp_dir.path(), 7);

        let mut config = test_config(temp_dir.path());
        config.max_concurrency = width;

        let store = Arc::new(MockStore::new());
        let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

        let summary = uploader.run().await.unwrap();
        assert_eq!(summary.total, 7, "width {}", width);
        assert_eq!(summary.succeeded, 7, "width {}", width);
        assert_eq!(summary.failed, 0, "width {}", width);
        assert_eq!(store.recorded_keys().len(), 7, "width {}", width);
    }
}

/// Keys preserve the relative path structure under the prefix.
#[tokio::test]
async fn test_keys_preserve_relative_structure() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("logs").join("2024");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(temp_dir.path().join("top.txt"), b"x").unwrap();
    std::fs::write(nested.join("deep.txt"), b"x").unwrap();

    let store = Arc::new(MockStore::new());
    let uploader = Uploader::with_store(
        test_config(temp_dir.path()),
        store.clone(),
        Arc::new(NullProgress),
    );

    uploader.run().await.unwrap();

    assert_eq!(
        store.recorded_keys(),
        vec!["backup/logs/2024/deep.txt", "backup/top.txt"]
    );
}

/// A failing subset is counted exactly; every other file is still attempted.
#[tokio::test]
async fn test_partial_failure_aggregates_count() {
    let temp_dir = TempDir::new().unwrap();
    populate_tree(temp_dir.path(), 5);

    let store = Arc::new(MockStore::failing(&[
        "backup/file-01.txt",
        "backup/file-03.txt",
    ]));
    let uploader = Uploader::with_store(
        test_config(temp_dir.path()),
        store.clone(),
        Arc::new(NullProgress),
    );

    let err = uploader.run().await.unwrap_err();
    assert!(err.to_string().contains("failed to upload 2 files"));

    // All five puts were attempted despite the failures.
    assert_eq!(store.recorded_keys().len(), 5);
}

/// Zero matching files succeeds trivially without touching the port.
#[tokio::test]
async fn test_zero_files_succeeds_without_puts() {
    let temp_dir = TempDir::new().unwrap();
    populate_tree(temp_dir.path(), 3);

    let mut config = test_config(temp_dir.path());
    config.pattern = "*.log".to_string();

    let store = Arc::new(MockStore::new());
    let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

    let summary = uploader.run().await.unwrap();
    assert_eq!(summary.total, 0);
    assert!(store.recorded_keys().is_empty());
}

/// Pattern filtering only uploads matching base names.
#[tokio::test]
async fn test_pattern_filtering_selects_subset() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("a.txt"), b"x").unwrap();
    std::fs::write(temp_dir.path().join("b.log"), b"x").unwrap();
    std::fs::write(temp_dir.path().join("c.txt"), b"x").unwrap();

    let mut config = test_config(temp_dir.path());
    config.pattern = "*.txt".to_string();

    let store = Arc::new(MockStore::new());
    let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

    let summary = uploader.run().await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(store.recorded_keys(), vec!["backup/a.txt", "backup/c.txt"]);
}

/// A pool far wider than the file count still terminates cleanly.
#[tokio::test]
async fn test_width_exceeding_file_count_terminates() {
    let temp_dir = TempDir::new().unwrap();
    populate_tree(temp_dir.path(), 3);

    let mut config = test_config(temp_dir.path());
    config.max_concurrency = 64;

    let store = Arc::new(MockStore::new());
    let uploader = Uploader::with_store(config, store.clone(), Arc::new(NullProgress));

    let summary = uploader.run().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(store.recorded_keys().len(), 3);
}

/// A hanging storage port trips the run deadline instead of blocking forever.
#[tokio::test]
async fn test_deadline_fires_on_hanging_store() {
    let temp_dir = TempDir::new().unwrap();
    populate_tree(temp_dir.path(), 2);

    let mut config = test_config(temp_dir.path());
    config.deadline_secs = 1;

    let store = Arc::new(MockStore::hanging());
    let uploader = Uploader::with_store(config, store, Arc::new(NullProgress));

    let err = uploader.run().await.unwrap_err();
    assert!(err.to_string().contains("deadline"));
}

/// The observer sees the total up front and exactly one unit per job,
/// failures included.
#[tokio::test]
async fn test_progress_counts_every_job_once() {
    let temp_dir = TempDir::new().unwrap();
    populate_tree(temp_dir.path(), 6);

    let store = Arc::new(MockStore::failing(&["backup/file-02.txt"]));
    let progress = Arc::new(CountingProgress::new());
    let uploader =
        Uploader::with_store(test_config(temp_dir.path()), store, progress.clone());

    // The run fails overall (one file failed) but progress still covers
    // every job.
    assert!(uploader.run().await.is_err());

    assert_eq!(progress.total.load(Ordering::SeqCst), 6);
    assert_eq!(progress.units.load(Ordering::SeqCst), 6);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
}
