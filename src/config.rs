// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-request solver configuration.
//!
//! The issuer's webhook `config` block is decoded on every call:
//!
//! ```yaml
//! solverName: hetzner
//! config:
//!   apiKeySecretRef:
//!     name: hetzner-secret
//!     key: api-key
//!   zoneId: xxxZZZ111   # optional, skips the zone lookup in present
//! ```
//!
//! Every field is optional and `null` counts as missing. A missing secret name
//! or key falls back to the process-wide default independently of the other.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dns_errors::SolverError;

/// Reference to one key of a Kubernetes `Secret` in the challenge namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretKeySelector {
    /// Secret name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Key within the secret's data
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
}

impl SecretKeySelector {
    /// Build a selector from name and key.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Decoded solver configuration for one challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Where the DNS API token lives
    #[serde(deserialize_with = "null_as_default")]
    pub api_key_secret_ref: SecretKeySelector,
    /// Zone id pinned by the issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl SolverConfig {
    /// Configuration made of the defaults only.
    #[must_use]
    pub fn from_defaults(defaults: &SecretKeySelector) -> Self {
        Self {
            api_key_secret_ref: defaults.clone(),
            zone_id: None,
        }
    }
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode the raw `config` of a challenge, filling gaps from `defaults`.
///
/// An absent or `null` config yields the defaults. An empty `zoneId` is treated as unset.
///
/// # Errors
///
/// Returns [`SolverError::ConfigDecode`] if `raw` does not decode into the
/// expected shape.
pub fn load_config(
    raw: Option<&Value>,
    defaults: &SecretKeySelector,
) -> Result<SolverConfig, SolverError> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(SolverConfig::from_defaults(defaults));
    };

    let mut cfg: SolverConfig =
        serde_json::from_value(raw.clone()).map_err(|e| SolverError::ConfigDecode {
            reason: e.to_string(),
        })?;

    if cfg.api_key_secret_ref.name.is_empty() {
        cfg.api_key_secret_ref.name.clone_from(&defaults.name);
    }
    if cfg.api_key_secret_ref.key.is_empty() {
        cfg.api_key_secret_ref.key.clone_from(&defaults.key);
    }
    cfg.zone_id = cfg.zone_id.filter(|id| !id.is_empty());

    Ok(cfg)
}
