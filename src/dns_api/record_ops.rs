// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record create/list/delete operations against the DNS API.

use reqwest::{Client as HttpClient, Method};
use tracing::info;

use super::request::{dns_api_request, encode_component};
use super::types::{
    CreateRecordRequest, CreateRecordResponse, GetAllRecordsResponse, Record, RecordInfo,
};
use crate::dns_errors::DnsApiError;

/// Create a record in a zone.
///
/// # Arguments
/// * `client` - HTTP client
/// * `api_key` - Raw API token
/// * `base_url` - API base URL
/// * `zone_id` - Identifier of the target zone
/// * `info` - Type, name, value and TTL of the new record
///
/// # Returns
///
/// The record as stored by the provider, including its generated id.
///
/// # Errors
///
/// Returns an error if the request fails, the provider rejects the payload,
/// or the response does not decode.
pub async fn create_record(
    client: &HttpClient,
    api_key: &str,
    base_url: &str,
    zone_id: &str,
    info: &RecordInfo,
) -> Result<Record, DnsApiError> {
    let url = format!("{base_url}/v1/records");

    let body = serde_json::to_vec(&CreateRecordRequest::new(zone_id, info)).map_err(|e| {
        DnsApiError::Encode {
            operation: "createRecord",
            reason: e.to_string(),
        }
    })?;

    let text = dns_api_request(client, api_key, Method::POST, &url, Some(body)).await?;

    let res: CreateRecordResponse =
        serde_json::from_str(&text).map_err(|e| DnsApiError::Decode {
            operation: "createRecord",
            url: url.clone(),
            reason: e.to_string(),
        })?;

    info!(
        zone_id = %zone_id,
        record_id = %res.record.id,
        record_type = %res.record.record_type,
        name = %res.record.name,
        "Created DNS record"
    );

    Ok(res.record)
}

/// Delete a record by id.
///
/// A record that does not exist is an error (the provider answers 404).
///
/// # Errors
///
/// Returns an error if the request fails or the status is not 200.
pub async fn delete_record(
    client: &HttpClient,
    api_key: &str,
    base_url: &str,
    id: &str,
) -> Result<(), DnsApiError> {
    let url = format!("{base_url}/v1/records/{}", encode_component(id));

    dns_api_request(client, api_key, Method::DELETE, &url, None).await?;

    info!(record_id = %id, "Deleted DNS record");
    Ok(())
}

/// List all records of a zone, in provider order.
///
/// # Errors
///
/// Returns an error if the request fails, the status is not 200, or the
/// response does not decode.
pub async fn load_records(
    client: &HttpClient,
    api_key: &str,
    base_url: &str,
    zone_id: &str,
) -> Result<Vec<Record>, DnsApiError> {
    let url = format!("{base_url}/v1/records?zone_id={}", encode_component(zone_id));

    let text = dns_api_request(client, api_key, Method::GET, &url, None).await?;

    let res: GetAllRecordsResponse =
        serde_json::from_str(&text).map_err(|e| DnsApiError::Decode {
            operation: "getAllRecords",
            url: url.clone(),
            reason: e.to_string(),
        })?;

    Ok(res.records)
}

#[cfg(test)]
#[path = "record_ops_tests.rs"]
mod record_ops_tests;
