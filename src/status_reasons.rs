// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard status reasons for challenge responses.
//!
//! This module defines constants for the `reason` field of the
//! `metav1.Status` object cert-manager receives when a challenge fails.
//! Reasons are programmatic identifiers in CamelCase that explain why a
//! `present` or `cleanup` call did not succeed.
//!
//! # Example Response
//!
//! ```yaml
//! response:
//!   uid: 5c7bd9f4-0f5a-4d58-9b1c-9a9c2c1a2f11
//!   success: false
//!   status:
//!     status: Failure
//!     reason: ZoneNotFound
//!     message: "Zone 'example.org' not found (no unique match)"
//! ```

// ============================================================================
// Solver Reasons
// ============================================================================

/// The per-request solver configuration could not be decoded.
pub const REASON_CONFIG_INVALID: &str = "InvalidSolverConfig";

/// The API key secret or key within it could not be read.
pub const REASON_CREDENTIAL_UNAVAILABLE: &str = "CredentialUnavailable";

/// The resolved FQDN is not of the form `<label>.<zone>.`.
pub const REASON_MALFORMED_FQDN: &str = "MalformedFQDN";

/// No unique zone matched the zone name derived from the FQDN.
pub const REASON_ZONE_NOT_FOUND: &str = "ZoneNotFound";

/// No TXT record with the challenge name exists during clean-up.
pub const REASON_RECORD_NOT_FOUND: &str = "RecordNotFound";

/// The solver was invoked before `initialize` completed.
pub const REASON_NOT_INITIALIZED: &str = "SolverNotInitialized";

/// The request named an action other than `present` or `cleanup`.
pub const REASON_UNKNOWN_ACTION: &str = "UnknownAction";

/// The payload carried no `request` object.
pub const REASON_MISSING_REQUEST: &str = "MissingChallengeRequest";

// ============================================================================
// DNS API Reasons
// ============================================================================

/// Generic DNS API failure (request could not be encoded, body did not decode).
pub const REASON_API_ERROR: &str = "DnsApiError";

/// The DNS API rejected the request as malformed (HTTP 400).
pub const REASON_DNS_API_BAD_REQUEST: &str = "DnsApiBadRequest";

/// The API token was missing or rejected (HTTP 401/403).
pub const REASON_DNS_API_AUTH_FAILED: &str = "DnsApiAuthFailed";

/// The targeted zone or record does not exist (HTTP 404).
pub const REASON_DNS_API_NOT_FOUND: &str = "DnsApiResourceNotFound";

/// The request conflicts with existing state (HTTP 409).
pub const REASON_DNS_API_CONFLICT: &str = "DnsApiConflict";

/// The payload was well-formed but rejected (HTTP 422).
pub const REASON_DNS_API_UNPROCESSABLE: &str = "DnsApiUnprocessableEntity";

/// The API rate limit was hit (HTTP 429).
pub const REASON_DNS_API_RATE_LIMITED: &str = "DnsApiRateLimited";

/// The DNS API reported an internal error (HTTP 500).
pub const REASON_DNS_API_INTERNAL_ERROR: &str = "DnsApiInternalError";

/// A gateway in front of the DNS API failed (HTTP 502/503/504).
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// The DNS API could not be reached, or answered with an unexpected status.
pub const REASON_DNS_API_UNREACHABLE: &str = "DnsApiUnreachable";
