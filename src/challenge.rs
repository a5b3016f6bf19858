// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! cert-manager webhook challenge types.
//!
//! cert-manager talks to external DNS-01 solvers by POSTing a
//! `ChallengePayload` (`webhook.acme.cert-manager.io/v1alpha1`) that carries a
//! [`ChallengeRequest`], and expects the same envelope back with a
//! [`ChallengeResponse`] filled in.
//!
//! # Example Payload
//!
//! ```json
//! {
//!   "apiVersion": "webhook.acme.cert-manager.io/v1alpha1",
//!   "kind": "ChallengePayload",
//!   "request": {
//!     "uid": "keeMie5akeeMie5a",
//!     "action": "present",
//!     "type": "dns-01",
//!     "dnsName": "example.org",
//!     "key": "ABCsecretlySigned",
//!     "resourceNamespace": "default",
//!     "resolvedFQDN": "_acme-challenge.example.org.",
//!     "resolvedZone": "example.org.",
//!     "allowAmbientCredentials": false,
//!     "config": { "apiKeySecretRef": { "name": "hetzner-secret", "key": "api-key" } }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{CHALLENGE_PAYLOAD_API_VERSION, CHALLENGE_PAYLOAD_KIND};

/// Action cert-manager asks the solver to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeAction {
    /// Publish the TXT record
    Present,
    /// Remove the TXT record
    CleanUp,
    /// Anything else
    #[default]
    #[serde(other)]
    Unknown,
}

impl ChallengeAction {
    /// Label used in logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::CleanUp => "cleanup",
            Self::Unknown => "unknown",
        }
    }
}

/// A single DNS-01 challenge as seen by the solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeRequest {
    /// Correlation identifier of the challenge
    pub uid: String,
    /// Requested action
    pub action: ChallengeAction,
    /// Challenge type (always `dns-01` for this solver)
    #[serde(rename = "type")]
    pub challenge_type: String,
    /// Domain the certificate is requested for
    pub dns_name: String,
    /// Value to publish in the TXT record
    pub key: String,
    /// Namespace secrets are resolved in
    pub resource_namespace: String,
    /// Trailing-dot FQDN of the TXT record (e.g., `_acme-challenge.example.org.`)
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    /// Trailing-dot zone cert-manager resolved (informational)
    pub resolved_zone: String,
    /// Whether ambient credentials may be used (ignored by this solver)
    pub allow_ambient_credentials: bool,
    /// Raw solver configuration from the issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// `metav1.Status` subset reported on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Always `Failure`
    pub status: String,
    /// Human-readable error
    pub message: String,
    /// CamelCase reason from `status_reasons`
    pub reason: String,
}

/// Result of a challenge call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Echo of the request uid
    pub uid: String,
    /// Whether the action succeeded
    pub success: bool,
    /// Failure details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

impl ChallengeResponse {
    /// Successful response for `uid`.
    #[must_use]
    pub fn success(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            success: true,
            status: None,
        }
    }

    /// Failed response for `uid`.
    #[must_use]
    pub fn failure(uid: &str, reason: &str, message: String) -> Self {
        Self {
            uid: uid.to_string(),
            success: false,
            status: Some(ResponseStatus {
                status: "Failure".to_string(),
                message,
                reason: reason.to_string(),
            }),
        }
    }
}

/// Envelope exchanged with cert-manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// `webhook.acme.cert-manager.io/v1alpha1`
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// `ChallengePayload`
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Present on the way in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    /// Present on the way out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    /// Build the reply envelope carrying `response`.
    #[must_use]
    pub fn reply(response: ChallengeResponse) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            request: None,
            response: Some(response),
        }
    }
}

fn default_api_version() -> String {
    CHALLENGE_PAYLOAD_API_VERSION.to_string()
}

fn default_kind() -> String {
    CHALLENGE_PAYLOAD_KIND.to_string()
}
