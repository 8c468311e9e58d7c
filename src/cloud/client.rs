//! S3 client construction.
//!
//! Builds a shared `S3Client` from the configured region and credential
//! material. Credential precedence mirrors the config file: static keys
//! when both are present, then a named profile, then the environment's
//! default provider chain.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::{ProfileProvider, StaticProvider};
use rusoto_s3::S3Client;

/// Resolve the region name, falling back to the SDK default when the name
/// does not parse.
pub fn resolve_region(region_name: Option<&str>) -> Region {
    match region_name {
        Some(name) => match name.parse::<Region>() {
            Ok(r) => r,
            Err(_) => {
                warn!("Invalid region '{}', using default", name);
                Region::default()
            }
        },
        None => Region::default(),
    }
}

/// Create an S3 client with the specified region and credentials.
pub fn create_s3_client(
    region_name: Option<&str>,
    profile: Option<&str>,
    access_key: Option<&str>,
    secret_key: Option<&str>,
) -> Result<Arc<S3Client>> {
    let region = resolve_region(region_name);

    let client = match (access_key, secret_key) {
        (Some(access), Some(secret)) if !access.is_empty() && !secret.is_empty() => {
            let provider = StaticProvider::new_minimal(access.to_string(), secret.to_string());
            let http_client = HttpClient::new().context("Failed to create HTTP client")?;
            Arc::new(S3Client::new_with(http_client, provider, region))
        }
        _ => {
            if let Some(profile_name) = profile {
                match ProfileProvider::new() {
                    Ok(mut provider) => {
                        provider.set_profile(profile_name);
                        let http_client =
                            HttpClient::new().context("Failed to create HTTP client")?;
                        Arc::new(S3Client::new_with(http_client, provider, region))
                    }
                    Err(e) => {
                        warn!("Failed to create AWS profile provider: {}, using default", e);
                        Arc::new(S3Client::new(region))
                    }
                }
            } else {
                Arc::new(S3Client::new(region))
            }
        }
    };

    Ok(client)
}
