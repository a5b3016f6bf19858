// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error code mapping to challenge failure reasons.
//!
//! This module provides utilities for mapping HTTP status codes from the Hetzner DNS API
//! to standardized failure reasons. They are attached to error logs, and
//! [`SolverError::reason`](crate::dns_errors::SolverError::reason) copies them
//! into the `status.reason` field cert-manager receives.
//!
//! # Usage
//!
//! ```rust
//! use hetzner_dns01::http_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(401);
//! assert_eq!(reason, "DnsApiAuthFailed");
//!
//! let (reason, message) = map_http_error_to_reason(500);
//! assert_eq!(reason, "DnsApiInternalError");
//! ```

use crate::status_reasons::{
    REASON_DNS_API_AUTH_FAILED, REASON_DNS_API_BAD_REQUEST, REASON_DNS_API_CONFLICT,
    REASON_DNS_API_INTERNAL_ERROR, REASON_DNS_API_NOT_FOUND, REASON_DNS_API_RATE_LIMITED,
    REASON_DNS_API_UNPROCESSABLE, REASON_DNS_API_UNREACHABLE, REASON_GATEWAY_ERROR,
};

/// Map HTTP status code to failure reason and message.
///
/// # Arguments
///
/// * `status_code` - HTTP status code (e.g., 400, 404, 500)
///
/// # Returns
///
/// A tuple of `(reason, message)`:
/// - `reason` - Constant from `status_reasons` module
/// - `message` - Human-readable explanation of the error
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400 | `DnsApiBadRequest` | Invalid request format |
/// | 401 | `DnsApiAuthFailed` | Missing or invalid API token |
/// | 403 | `DnsApiAuthFailed` | Token lacks permission |
/// | 404 | `DnsApiResourceNotFound` | Zone or record not found |
/// | 409 | `DnsApiConflict` | Conflicting record |
/// | 422 | `DnsApiUnprocessableEntity` | Payload rejected |
/// | 429 | `DnsApiRateLimited` | Rate limit hit |
/// | 500 | `DnsApiInternalError` | Internal server error |
/// | 502-504 | `GatewayError` | Gateway failure |
/// | Other | `DnsApiUnreachable` | Unexpected status |
///
/// # Example
///
/// ```rust
/// use hetzner_dns01::http_errors::map_http_error_to_reason;
///
/// let (reason, message) = map_http_error_to_reason(404);
/// assert_eq!(reason, "DnsApiResourceNotFound");
/// assert!(message.contains("404"));
/// ```
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_DNS_API_BAD_REQUEST,
            "Invalid request to DNS API (400)".into(),
        ),
        401 => (
            REASON_DNS_API_AUTH_FAILED,
            "DNS API token missing or invalid (401)".into(),
        ),
        403 => (
            REASON_DNS_API_AUTH_FAILED,
            "DNS API token not authorized (403)".into(),
        ),
        404 => (
            REASON_DNS_API_NOT_FOUND,
            "Zone or record not found in DNS API (404)".into(),
        ),
        409 => (
            REASON_DNS_API_CONFLICT,
            "Record conflicts with existing DNS data (409)".into(),
        ),
        422 => (
            REASON_DNS_API_UNPROCESSABLE,
            "DNS API rejected the record payload (422)".into(),
        ),
        429 => (
            REASON_DNS_API_RATE_LIMITED,
            "DNS API rate limit exceeded (429)".into(),
        ),
        500 => (
            REASON_DNS_API_INTERNAL_ERROR,
            "DNS API internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching DNS API (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "DNS API service unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching DNS API (504)".into(),
        ),
        _ => (
            REASON_DNS_API_UNREACHABLE,
            format!("Unexpected HTTP status from DNS API ({status_code})"),
        ),
    }
}

/// Map connection error to failure reason and message.
///
/// Use this when the HTTP client cannot establish a connection to the DNS API,
/// before receiving any HTTP status code.
///
/// # Common Causes
///
/// - Wrong `--api-base-url`
/// - Egress network policy blocking traffic
/// - DNS resolution failure
/// - Request timeout
#[must_use]
pub fn map_connection_error() -> (&'static str, String) {
    (
        REASON_DNS_API_UNREACHABLE,
        "Cannot connect to DNS API (network error or timeout)".into(),
    )
}
