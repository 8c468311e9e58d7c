//! Storage port: the capability the worker pool uploads through.
//!
//! The pool only ever sees [`ObjectStore`], so the engine can be tested
//! against an in-memory implementation and the production binary can plug
//! in the rusoto-backed [`S3ObjectStore`]. Every failure carries a
//! structured [`ErrorClass`] instead of free-text the caller would have to
//! sniff.

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use rusoto_core::{ByteStream, RusotoError};
use rusoto_s3::{PutObjectRequest, S3Client, S3};

/// Coarse classification of a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Likely to succeed on a later run: network trouble, throttling, 5xx
    Transient,
    /// Rejected outright; retrying without changes will not help
    Permanent,
    /// Credential or permission problem
    Auth,
    /// The bucket lives in a different region than the client targets
    RegionMismatch,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Transient => write!(f, "transient"),
            ErrorClass::Permanent => write!(f, "permanent"),
            ErrorClass::Auth => write!(f, "auth"),
            ErrorClass::RegionMismatch => write!(f, "region-mismatch"),
        }
    }
}

/// A classified storage failure.
#[derive(Debug)]
pub struct StoreError {
    class: ErrorClass,
    source: anyhow::Error,
}

impl StoreError {
    pub fn new(class: ErrorClass, source: anyhow::Error) -> Self {
        StoreError { class, source }
    }

    /// Wrap a local I/O failure. Local read errors are reported through the
    /// same channel as remote failures, so the pool treats them uniformly.
    pub fn local(err: std::io::Error) -> Self {
        StoreError {
            class: ErrorClass::Permanent,
            source: anyhow!(err),
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.class, self.source)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

/// The remote storage capability: accept a key and a body, return a
/// classified success or failure.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

/// Map an HTTP status to an [`ErrorClass`].
///
/// S3 answers a wrong-region request with a 301 PermanentRedirect, which is
/// the structured signal behind [`ErrorClass::RegionMismatch`].
pub fn classify_status(status: u16) -> ErrorClass {
    match status {
        301 => ErrorClass::RegionMismatch,
        401 | 403 => ErrorClass::Auth,
        429 => ErrorClass::Transient,
        s if s >= 500 => ErrorClass::Transient,
        _ => ErrorClass::Permanent,
    }
}

fn classify_rusoto<E>(err: &RusotoError<E>) -> ErrorClass
where
    E: std::error::Error + 'static,
{
    match err {
        RusotoError::Credentials(_) => ErrorClass::Auth,
        RusotoError::HttpDispatch(_) => ErrorClass::Transient,
        RusotoError::Unknown(response) => classify_status(response.status.as_u16()),
        _ => ErrorClass::Permanent,
    }
}

/// rusoto-backed implementation of [`ObjectStore`] targeting one bucket.
pub struct S3ObjectStore {
    client: Arc<S3Client>,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Arc<S3Client>, bucket: &str) -> Self {
        S3ObjectStore {
            client,
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            body: Some(ByteStream::from(body)),
            ..Default::default()
        };

        self.client.put_object(request).await.map(|_| ()).map_err(|e| {
            let class = classify_rusoto(&e);
            StoreError::new(class, anyhow!(e))
        })
    }
}
