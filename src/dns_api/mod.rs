// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hetzner DNS HTTP API client.
//!
//! This module maps four logical operations onto authenticated HTTP exchanges
//! and decodes their JSON bodies. It has no ACME knowledge:
//!
//! - Looking up a zone by name
//! - Creating a record in a zone
//! - Listing the records of a zone
//! - Deleting a record by id
//!
//! # Architecture
//!
//! The operations are free functions in [`zone_ops`] and [`record_ops`] taking
//! the HTTP client, token and base URL. [`HetznerDns`] binds those three
//! together and implements the [`DnsClient`] trait the solver depends on.
//! [`HetznerClientFactory`] hands out one [`HetznerDns`] per API key.
//!
//! # Example
//!
//! ```rust,no_run
//! use hetzner_dns01::dns_api::{DnsClient, HetznerDns};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), hetzner_dns01::dns_errors::DnsApiError> {
//! let dns = HetznerDns::new("api-token", "https://dns.hetzner.com/api", Duration::from_secs(30))?;
//!
//! if let Some(zone) = dns.load_zone_by_name("example.org").await? {
//!     let records = dns.load_records(&zone.id).await?;
//!     println!("{} records in {}", records.len(), zone.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod record_ops;
pub(crate) mod request;
pub mod types;
pub mod zone_ops;

pub use types::{Record, RecordInfo, Zone};

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;

use crate::dns_errors::DnsApiError;

/// Operations the solver needs from a DNS provider.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Load a zone by exact name; `None` when zero or several zones match.
    async fn load_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DnsApiError>;

    /// Create a record in the given zone.
    async fn create_record(&self, zone_id: &str, info: &RecordInfo)
        -> Result<Record, DnsApiError>;

    /// Delete a record by id.
    async fn delete_record(&self, id: &str) -> Result<(), DnsApiError>;

    /// List all records of a zone.
    async fn load_records(&self, zone_id: &str) -> Result<Vec<Record>, DnsApiError>;
}

/// Builds a [`DnsClient`] bound to one API key.
///
/// The solver asks for a fresh client on every call because the key is
/// resolved per request.
pub trait DnsClientFactory: Send + Sync {
    /// Create a client authenticating with `api_key`.
    fn create(&self, api_key: &str) -> Box<dyn DnsClient>;
}

/// Normalise an API base URL (strip trailing slashes).
#[must_use]
pub fn build_api_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build the HTTP client used for DNS API calls.
///
/// # Errors
///
/// Returns [`DnsApiError::ClientBuild`] if the TLS backend cannot be initialised.
pub fn build_http_client(timeout: Duration) -> Result<HttpClient, DnsApiError> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DnsApiError::ClientBuild {
            reason: e.to_string(),
        })
}

/// Hetzner DNS API client bound to one API key.
#[derive(Debug, Clone)]
pub struct HetznerDns {
    /// HTTP client for API requests
    client: HttpClient,
    /// Raw API token sent in the `Auth-API-Token` header
    api_key: String,
    /// Normalised API base URL
    base_url: String,
}

impl HetznerDns {
    /// Create a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, DnsApiError> {
        Ok(Self::with_client(
            build_http_client(timeout)?,
            api_key,
            base_url,
        ))
    }

    /// Create a client reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: HttpClient, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: build_api_url(base_url),
        }
    }

    /// Normalised API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DnsClient for HetznerDns {
    async fn load_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DnsApiError> {
        zone_ops::load_zone_by_name(&self.client, &self.api_key, &self.base_url, name).await
    }

    async fn create_record(
        &self,
        zone_id: &str,
        info: &RecordInfo,
    ) -> Result<Record, DnsApiError> {
        record_ops::create_record(&self.client, &self.api_key, &self.base_url, zone_id, info).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), DnsApiError> {
        record_ops::delete_record(&self.client, &self.api_key, &self.base_url, id).await
    }

    async fn load_records(&self, zone_id: &str) -> Result<Vec<Record>, DnsApiError> {
        record_ops::load_records(&self.client, &self.api_key, &self.base_url, zone_id).await
    }
}

/// Factory producing [`HetznerDns`] clients that share one connection pool.
#[derive(Debug, Clone)]
pub struct HetznerClientFactory {
    client: HttpClient,
    base_url: String,
}

impl HetznerClientFactory {
    /// Create a factory for the given base URL and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DnsApiError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: build_api_url(base_url),
        })
    }
}

impl DnsClientFactory for HetznerClientFactory {
    fn create(&self, api_key: &str) -> Box<dyn DnsClient> {
        Box::new(HetznerDns::with_client(
            self.client.clone(),
            api_key,
            &self.base_url,
        ))
    }
}
