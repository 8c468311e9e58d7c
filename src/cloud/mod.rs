//! Cloud storage integration.
//!
//! This module holds everything that touches the S3 side of an upload run:
//! client construction with the configured credential chain, object-key
//! derivation from local paths, and the storage port the worker pool
//! uploads through.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐      ┌─────────────┐      ┌───────────────┐
//! │ Worker Pool  │─────▶│ ObjectStore │─────▶│ S3ObjectStore │
//! └──────────────┘      │   (port)    │      │   (rusoto)    │
//!                       └─────────────┘      └───────┬───────┘
//!                                                    │
//!                                            ┌───────▼───────┐
//!                                            │   S3 Bucket   │
//!                                            └───────────────┘
//! ```
//!
//! The port returns a structured [`store::ErrorClass`] with every failure,
//! so callers never have to sniff provider error text.

/// S3 client construction with region and credential handling
pub mod client;

/// Object-key derivation from local file paths
pub mod keys;

/// Storage port trait, error classification, and the S3 adapter
pub mod store;
