// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone lookups against the DNS API.

use reqwest::{Client as HttpClient, Method};
use tracing::debug;

use super::request::{dns_api_request, encode_component};
use super::types::{GetAllZonesResponse, Zone};
use crate::dns_errors::DnsApiError;

/// Load a zone by its exact name.
///
/// Returns `Ok(None)` when the provider lists zero zones, and also when it
/// lists more than one: an ambiguous match is not a match.
///
/// # Arguments
/// * `client` - HTTP client
/// * `api_key` - Raw API token
/// * `base_url` - API base URL (e.g., `https://dns.hetzner.com/api`)
/// * `name` - Zone name without trailing dot
///
/// # Errors
///
/// Returns an error on transport failure, non-200 status or an undecodable body.
pub async fn load_zone_by_name(
    client: &HttpClient,
    api_key: &str,
    base_url: &str,
    name: &str,
) -> Result<Option<Zone>, DnsApiError> {
    let url = format!("{base_url}/v1/zones?name={}", encode_component(name));

    let text = dns_api_request(client, api_key, Method::GET, &url, None).await?;

    let res: GetAllZonesResponse =
        serde_json::from_str(&text).map_err(|e| DnsApiError::Decode {
            operation: "getAllZones",
            url: url.clone(),
            reason: e.to_string(),
        })?;

    if res.zones.len() == 1 {
        return Ok(res.zones.into_iter().next());
    }

    debug!(zone = %name, matches = res.zones.len(), "No unique zone match");
    Ok(None)
}

#[cfg(test)]
#[path = "zone_ops_tests.rs"]
mod zone_ops_tests;
