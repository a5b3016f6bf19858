// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # hetzner-dns01 - cert-manager ACME DNS-01 solver for Hetzner DNS
//!
//! hetzner-dns01 lets cert-manager prove control of a domain by publishing the
//! ACME challenge TXT record through the Hetzner DNS HTTP API and removing it
//! once the challenge is validated.
//!
//! ## Overview
//!
//! The library provides:
//!
//! - A thin, typed client for the four Hetzner DNS operations the solver needs
//! - The challenge solver (`present` / `cleanup`) on top of that client
//! - Per-issuer configuration and API key resolution from Kubernetes secrets
//! - The cert-manager webhook HTTP surface
//!
//! ## Modules
//!
//! - [`dns_api`] - Hetzner DNS HTTP API client
//! - [`solver`] - Challenge solver
//! - [`challenge`] - cert-manager webhook payload types
//! - [`config`] - Per-issuer solver configuration
//! - [`credentials`] - API key lookup in Kubernetes secrets
//! - [`webhook`] - axum router serving cert-manager
//! - [`tls`] - HTTPS listener and rustls setup
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use hetzner_dns01::challenge::{ChallengeAction, ChallengeRequest};
//! use hetzner_dns01::solver::extract_domain;
//!
//! let request = ChallengeRequest {
//!     uid: "keeMie5akeeMie5a".to_string(),
//!     action: ChallengeAction::Present,
//!     key: "ABCsecretlySigned".to_string(),
//!     resource_namespace: "default".to_string(),
//!     resolved_fqdn: "_acme-challenge.example.org.".to_string(),
//!     ..Default::default()
//! };
//!
//! let (record, zone) = extract_domain(&request.resolved_fqdn).unwrap();
//! assert_eq!(record, "_acme-challenge");
//! assert_eq!(zone, "example.org");
//! ```

pub mod challenge;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod dns_api;
pub mod dns_errors;
pub mod http_errors;
pub mod metrics;
pub mod solver;
pub mod status_reasons;
pub mod tls;
pub mod webhook;
