// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS API and challenge solver error types.
//!
//! This module provides specialized error types for:
//! - Hetzner DNS HTTP API operations (zone lookup, record management)
//! - Challenge solving (configuration, credentials, FQDN parsing, zone/record resolution)
//!
//! No error is retried or downgraded inside the crate. Each error carries the
//! operation and the target identifier so the host can surface it verbatim.

use crate::http_errors::{map_connection_error, map_http_error_to_reason};
use crate::status_reasons::{
    REASON_API_ERROR, REASON_CONFIG_INVALID, REASON_CREDENTIAL_UNAVAILABLE,
    REASON_MALFORMED_FQDN, REASON_NOT_INITIALIZED, REASON_RECORD_NOT_FOUND,
    REASON_ZONE_NOT_FOUND,
};
use thiserror::Error;

/// Errors that can occur while talking to the DNS provider HTTP API.
///
/// These errors have no ACME semantics. A zone lookup that matches zero or
/// several zones is *not* an error at this layer.
#[derive(Error, Debug, Clone)]
pub enum DnsApiError {
    /// HTTP connection failed (network unreachable, connection refused, timeout)
    ///
    /// Returned when no HTTP status was received at all.
    #[error("HTTP {method} request to {url} failed: {reason}")]
    Transport {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// Underlying transport error
        reason: String,
    },

    /// The provider answered with anything other than HTTP 200.
    #[error("HTTP {method} request to {url} failed with status {status}")]
    ApiStatus {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body (may be empty when it could not be read)
        body: String,
    },

    /// The provider answered HTTP 200 with a body that does not decode.
    #[error("Failed to decode {operation} response from {url}: {reason}")]
    Decode {
        /// Logical operation (e.g., `getAllZones`)
        operation: &'static str,
        /// Full request URL
        url: String,
        /// serde error message
        reason: String,
    },

    /// The outgoing request body could not be serialized.
    #[error("Failed to encode {operation} request: {reason}")]
    Encode {
        /// Logical operation (e.g., `createRecord`)
        operation: &'static str,
        /// serde error message
        reason: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build DNS API client: {reason}")]
    ClientBuild {
        /// reqwest builder error message
        reason: String,
    },
}

impl DnsApiError {
    /// HTTP status code carried by the error, if the provider returned one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Request URL carried by the error, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. } | Self::ApiStatus { url, .. } | Self::Decode { url, .. } => {
                Some(url)
            }
            Self::Encode { .. } | Self::ClientBuild { .. } => None,
        }
    }
}

/// Errors returned by the challenge solver to the host.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    /// Per-request solver configuration is not valid JSON for the expected shape.
    #[error("Failed to decode solver config: {reason}")]
    ConfigDecode {
        /// serde error message
        reason: String,
    },

    /// The API key could not be read from the secret store.
    #[error("Failed to load API key from secret '{namespace}/{secret_name}' (key '{secret_key}'): {reason}")]
    Credential {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Secret name
        secret_name: String,
        /// Key within the secret data
        secret_key: String,
        /// What went wrong
        reason: String,
    },

    /// The resolved FQDN does not have the `<label>.<zone>.` shape.
    #[error("Failed to split FQDN '{fqdn}' into record name and zone")]
    MalformedName {
        /// The offending FQDN
        fqdn: String,
    },

    /// Zone lookup returned zero or more than one zone.
    #[error("Zone '{zone}' not found (no unique match)")]
    ZoneNotFound {
        /// Zone name that was looked up
        zone: String,
    },

    /// No TXT record with the challenge name exists in the zone during clean-up.
    #[error("TXT record '{name}' not found in zone '{zone_id}'")]
    RecordNotFound {
        /// Record name (leading label)
        name: String,
        /// Zone identifier that was listed
        zone_id: String,
    },

    /// A DNS API call failed.
    #[error("Failed to {operation} '{target}': {source}")]
    Api {
        /// What the solver was doing (e.g., `create TXT record`)
        operation: &'static str,
        /// Zone name, zone id or record id the call targeted
        target: String,
        /// The client error
        #[source]
        source: DnsApiError,
    },

    /// The secret store handle could not be acquired during `initialize`.
    #[error("Failed to initialize solver: {reason}")]
    Initialize {
        /// What went wrong
        reason: String,
    },

    /// `present`/`clean_up` was called before `initialize`.
    #[error("Solver '{solver}' has not been initialized")]
    NotInitialized {
        /// Solver name
        solver: String,
    },
}

impl SolverError {
    /// Wrap a client error with the operation and its target.
    pub fn api(operation: &'static str, target: impl Into<String>, source: DnsApiError) -> Self {
        Self::Api {
            operation,
            target: target.into(),
            source,
        }
    }

    /// Stable CamelCase reason used in webhook failure responses.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ConfigDecode { .. } => REASON_CONFIG_INVALID,
            Self::Credential { .. } => REASON_CREDENTIAL_UNAVAILABLE,
            Self::MalformedName { .. } => REASON_MALFORMED_FQDN,
            Self::ZoneNotFound { .. } => REASON_ZONE_NOT_FOUND,
            Self::RecordNotFound { .. } => REASON_RECORD_NOT_FOUND,
            Self::Api { source, .. } => match source {
                DnsApiError::ApiStatus { status, .. } => map_http_error_to_reason(*status).0,
                DnsApiError::Transport { .. } => map_connection_error().0,
                _ => REASON_API_ERROR,
            },
            Self::Initialize { .. } | Self::NotInitialized { .. } => REASON_NOT_INITIALIZED,
        }
    }
}
