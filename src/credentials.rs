// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! API key resolution from Kubernetes secrets.
//!
//! The solver never caches a key: every `present`/`cleanup` reads the secret
//! again, because concurrent challenges can point at different namespaces and
//! secret references.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::sync::Arc;
use tracing::debug;

use crate::dns_errors::SolverError;

/// Resolves a namespaced secret reference into a string.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Read `secret_key` from secret `secret_name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Credential`] if the secret or key does not exist
    /// or the value is not UTF-8.
    async fn get_secret(
        &self,
        namespace: &str,
        secret_name: &str,
        secret_key: &str,
    ) -> Result<String, SolverError>;
}

/// Builds a [`CredentialResolver`] once the host hands over cluster access.
pub trait CredentialResolverFactory: Send + Sync {
    /// Connect to the secret store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Initialize`] if no client can be built.
    fn connect(&self, config: kube::Config) -> Result<Arc<dyn CredentialResolver>, SolverError>;
}

/// Reads secrets through the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretResolver {
    client: Client,
}

impl KubeSecretResolver {
    /// Wrap an existing Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialResolver for KubeSecretResolver {
    async fn get_secret(
        &self,
        namespace: &str,
        secret_name: &str,
        secret_key: &str,
    ) -> Result<String, SolverError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secret_api.get(secret_name).await.map_err(|e| {
            credential_error(
                namespace,
                secret_name,
                secret_key,
                format!("unable to get secret: {e}"),
            )
        })?;

        debug!(
            namespace = %namespace,
            secret = %secret_name,
            key = %secret_key,
            "Loaded API key secret"
        );

        extract_secret_value(&secret, namespace, secret_name, secret_key)
    }
}

/// Default factory: a [`KubeSecretResolver`] on a client built from the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeResolverFactory;

impl CredentialResolverFactory for KubeResolverFactory {
    fn connect(&self, config: kube::Config) -> Result<Arc<dyn CredentialResolver>, SolverError> {
        // kube cannot pick a provider when both ring and aws-lc-rs are linked
        crate::tls::ensure_crypto_provider();
        let client = Client::try_from(config).map_err(|e| SolverError::Initialize {
            reason: format!("failed to build Kubernetes client: {e}"),
        })?;
        Ok(Arc::new(KubeSecretResolver::new(client)))
    }
}

/// Pull one key out of a secret's data as UTF-8.
///
/// # Errors
///
/// Returns [`SolverError::Credential`] if the key is missing or not UTF-8.
pub fn extract_secret_value(
    secret: &Secret,
    namespace: &str,
    secret_name: &str,
    secret_key: &str,
) -> Result<String, SolverError> {
    let value = secret
        .data
        .as_ref()
        .and_then(|data| data.get(secret_key))
        .ok_or_else(|| {
            credential_error(
                namespace,
                secret_name,
                secret_key,
                "key missing in secret".to_string(),
            )
        })?;

    String::from_utf8(value.0.clone()).map_err(|_| {
        credential_error(
            namespace,
            secret_name,
            secret_key,
            "value is not valid UTF-8".to_string(),
        )
    })
}

fn credential_error(
    namespace: &str,
    secret_name: &str,
    secret_key: &str,
    reason: String,
) -> SolverError {
    SolverError::Credential {
        namespace: namespace.to_string(),
        secret_name: secret_name.to_string(),
        secret_key: secret_key.to_string(),
        reason,
    }
}
