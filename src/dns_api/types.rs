// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the Hetzner DNS API.
//!
//! Responses carry many more fields (timestamps, pagination, nameservers)
//! than the solver needs; serde ignores everything not listed here.

use serde::{Deserialize, Serialize};

/// A DNS zone owned by the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    /// Provider-assigned zone identifier
    pub id: String,
    /// Zone name without trailing dot (e.g., `example.org`)
    pub name: String,
}

/// An existing DNS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Provider-assigned record identifier
    pub id: String,
    /// Record type (e.g., `TXT`, `A`)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Identifier of the zone the record lives in
    pub zone_id: String,
    /// Record name relative to the zone (e.g., `_acme-challenge`)
    pub name: String,
    /// Record value
    pub value: String,
}

/// Parameters for creating a record. Only exists as a call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    /// Record type
    pub record_type: String,
    /// Record name relative to the zone
    pub name: String,
    /// Record value
    pub value: String,
    /// Time to live in seconds
    pub ttl: u64,
}

/// Body of `POST /v1/records`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub zone_id: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    pub ttl: u64,
}

impl<'a> CreateRecordRequest<'a> {
    pub(crate) fn new(zone_id: &'a str, info: &'a RecordInfo) -> Self {
        Self {
            zone_id,
            record_type: &info.record_type,
            name: &info.name,
            value: &info.value,
            ttl: info.ttl,
        }
    }
}

/// Response of `POST /v1/records`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateRecordResponse {
    pub record: Record,
}

/// Response of `GET /v1/zones`.
#[derive(Debug, Deserialize)]
pub(crate) struct GetAllZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Response of `GET /v1/records`.
#[derive(Debug, Deserialize)]
pub(crate) struct GetAllRecordsResponse {
    #[serde(default)]
    pub records: Vec<Record>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
