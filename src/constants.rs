// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the DNS-01 webhook solver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Solver Identity Constants
// ============================================================================

/// Solver name registered with cert-manager (`solverName` in the issuer webhook config)
pub const SOLVER_NAME: &str = "hetzner";

/// API version of the cert-manager webhook challenge payload
pub const WEBHOOK_API_VERSION: &str = "v1alpha1";

/// API group of the cert-manager webhook challenge payload envelope
pub const CHALLENGE_PAYLOAD_API_VERSION: &str = "webhook.acme.cert-manager.io/v1alpha1";

/// Kind of the cert-manager webhook challenge payload envelope
pub const CHALLENGE_PAYLOAD_KIND: &str = "ChallengePayload";

// ============================================================================
// DNS API Constants
// ============================================================================

/// Default base URL of the Hetzner DNS API
pub const DEFAULT_DNS_API_URL: &str = "https://dns.hetzner.com/api";

/// Header carrying the raw API token on every request
pub const AUTH_API_TOKEN_HEADER: &str = "Auth-API-Token";

/// Default timeout for a single DNS API request (30 seconds)
pub const DEFAULT_DNS_API_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record type used for ACME DNS-01 challenges
pub const RECORD_TYPE_TXT: &str = "TXT";

/// TTL of the challenge TXT record (2 minutes)
pub const CHALLENGE_RECORD_TTL_SECS: u64 = 120;

// ============================================================================
// Webhook Server Constants
// ============================================================================

/// Default bind address for the webhook HTTPS server
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8443";

/// Seconds a client gets to finish the TLS handshake
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Handshaken connections queued for the server before accepts wait
pub const TLS_ACCEPT_BACKLOG: usize = 64;

/// Path for the liveness/readiness endpoint
pub const HEALTH_PATH: &str = "/healthz";

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
