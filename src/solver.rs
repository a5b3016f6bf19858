// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! ACME DNS-01 challenge solving.
//!
//! [`HetznerSolver`] turns a cert-manager [`ChallengeRequest`] into DNS API
//! calls. It keeps no state between calls: configuration, API key, zone and
//! records are re-derived from the request and the provider every time.
//!
//! # Present
//!
//! 1. Decode the per-request config (defaults fill the gaps)
//! 2. Read the API key from the referenced secret
//! 3. Split `_acme-challenge.example.org.` into `_acme-challenge` / `example.org`
//! 4. Use the pinned `zoneId`, or look the zone up by name
//! 5. Create the TXT record (TTL 120)
//!
//! # Clean-up
//!
//! Steps 1-3 as above, then the zone is always looked up by name, its records
//! are listed and the matching TXT record is deleted. A missing record is an
//! error, not a no-op.
//!
//! # Example
//!
//! ```rust,no_run
//! use hetzner_dns01::config::SecretKeySelector;
//! use hetzner_dns01::credentials::KubeResolverFactory;
//! use hetzner_dns01::dns_api::HetznerClientFactory;
//! use hetzner_dns01::solver::{HetznerSolver, Solver, SolverSettings};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut solver = HetznerSolver::new(
//!     SolverSettings::new(SecretKeySelector::new("hetzner-secret", "api-key")),
//!     Arc::new(KubeResolverFactory),
//!     Arc::new(HetznerClientFactory::new("https://dns.hetzner.com/api", Duration::from_secs(30))?),
//! );
//! solver.initialize(kube::Config::infer().await?)?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::challenge::ChallengeRequest;
use crate::config::{load_config, SecretKeySelector, SolverConfig};
use crate::constants::{CHALLENGE_RECORD_TTL_SECS, RECORD_TYPE_TXT, SOLVER_NAME};
use crate::credentials::{CredentialResolver, CredentialResolverFactory};
use crate::dns_api::{DnsClient, DnsClientFactory, Record, RecordInfo, Zone};
use crate::dns_errors::SolverError;
use crate::metrics;

/// Call contract between the webhook host and a DNS-01 solver.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Constant solver identifier (`solverName` in the issuer).
    fn name(&self) -> &str;

    /// One-time setup: acquire the secret store handle.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Initialize`] if the handle cannot be acquired.
    fn initialize(&mut self, kube_config: kube::Config) -> Result<(), SolverError>;

    /// Publish the challenge TXT record.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the call chain; nothing is retried.
    async fn present(&self, ch: &ChallengeRequest) -> Result<(), SolverError>;

    /// Remove the challenge TXT record.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the call chain; nothing is retried.
    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<(), SolverError>;
}

/// Process-wide solver defaults, injected at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverSettings {
    /// Secret reference used when the issuer config omits name or key
    pub default_secret_ref: SecretKeySelector,
}

impl SolverSettings {
    /// Settings with the given default secret reference.
    #[must_use]
    pub fn new(default_secret_ref: SecretKeySelector) -> Self {
        Self { default_secret_ref }
    }
}

/// DNS-01 solver backed by the Hetzner DNS API.
pub struct HetznerSolver {
    settings: SolverSettings,
    resolver_factory: Arc<dyn CredentialResolverFactory>,
    dns_factory: Arc<dyn DnsClientFactory>,
    resolver: Option<Arc<dyn CredentialResolver>>,
}

/// Everything a call derives before touching zones.
struct Prepared {
    config: SolverConfig,
    dns: Box<dyn DnsClient>,
    record_name: String,
    zone_name: String,
}

impl HetznerSolver {
    /// Create a solver. [`Solver::initialize`] must run before use.
    #[must_use]
    pub fn new(
        settings: SolverSettings,
        resolver_factory: Arc<dyn CredentialResolverFactory>,
        dns_factory: Arc<dyn DnsClientFactory>,
    ) -> Self {
        Self {
            settings,
            resolver_factory,
            dns_factory,
            resolver: None,
        }
    }

    fn resolver(&self) -> Result<&Arc<dyn CredentialResolver>, SolverError> {
        self.resolver
            .as_ref()
            .ok_or_else(|| SolverError::NotInitialized {
                solver: SOLVER_NAME.to_string(),
            })
    }

    async fn prepare(&self, ch: &ChallengeRequest) -> Result<Prepared, SolverError> {
        let resolver = self.resolver()?;
        let config = load_config(ch.config.as_ref(), &self.settings.default_secret_ref)?;

        let secret_ref = &config.api_key_secret_ref;
        let api_key = resolver
            .get_secret(&ch.resource_namespace, &secret_ref.name, &secret_ref.key)
            .await?;

        let (record_name, zone_name) = extract_domain(&ch.resolved_fqdn)?;
        debug!(
            uid = %ch.uid,
            fqdn = %ch.resolved_fqdn,
            record = %record_name,
            zone = %zone_name,
            "Resolved challenge record"
        );

        Ok(Prepared {
            config,
            dns: self.dns_factory.create(&api_key),
            record_name,
            zone_name,
        })
    }

    async fn present_challenge(&self, ch: &ChallengeRequest) -> Result<(), SolverError> {
        let prepared = self.prepare(ch).await?;
        let dns = prepared.dns.as_ref();

        let zone_id = match &prepared.config.zone_id {
            Some(zone_id) => zone_id.clone(),
            None => find_zone(dns, &prepared.zone_name).await?.id,
        };

        let record = dns
            .create_record(
                &zone_id,
                &RecordInfo {
                    record_type: RECORD_TYPE_TXT.to_string(),
                    name: prepared.record_name.clone(),
                    value: ch.key.clone(),
                    ttl: CHALLENGE_RECORD_TTL_SECS,
                },
            )
            .await
            .map_err(|e| SolverError::api("create TXT record", &ch.resolved_fqdn, e))?;

        info!(
            dns_name = %ch.dns_name,
            uid = %ch.uid,
            zone_id = %zone_id,
            record_id = %record.id,
            "presented challenge"
        );
        Ok(())
    }

    async fn clean_up_challenge(&self, ch: &ChallengeRequest) -> Result<(), SolverError> {
        let prepared = self.prepare(ch).await?;
        let dns = prepared.dns.as_ref();

        let zone = find_zone(dns, &prepared.zone_name).await?;

        let records = dns
            .load_records(&zone.id)
            .await
            .map_err(|e| SolverError::api("load records of zone", &zone.id, e))?;

        let record = select_challenge_record(&records, &prepared.record_name, &ch.key)
            .ok_or_else(|| SolverError::RecordNotFound {
                name: prepared.record_name.clone(),
                zone_id: zone.id.clone(),
            })?;

        dns.delete_record(&record.id)
            .await
            .map_err(|e| SolverError::api("delete TXT record", &record.id, e))?;

        info!(
            dns_name = %ch.dns_name,
            uid = %ch.uid,
            zone_id = %zone.id,
            record_id = %record.id,
            "cleaned up challenge"
        );
        Ok(())
    }
}

#[async_trait]
impl Solver for HetznerSolver {
    fn name(&self) -> &str {
        SOLVER_NAME
    }

    fn initialize(&mut self, kube_config: kube::Config) -> Result<(), SolverError> {
        self.resolver = Some(self.resolver_factory.connect(kube_config)?);
        info!(solver = SOLVER_NAME, "Solver initialized");
        Ok(())
    }

    async fn present(&self, ch: &ChallengeRequest) -> Result<(), SolverError> {
        let start = Instant::now();
        let result = self.present_challenge(ch).await;
        record_outcome("present", ch, &result, start);
        result
    }

    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<(), SolverError> {
        let start = Instant::now();
        let result = self.clean_up_challenge(ch).await;
        record_outcome("cleanup", ch, &result, start);
        result
    }
}

fn record_outcome(
    action: &str,
    ch: &ChallengeRequest,
    result: &Result<(), SolverError>,
    start: Instant,
) {
    match result {
        Ok(()) => metrics::record_challenge_success(action, start.elapsed()),
        Err(e) => {
            warn!(
                action = action,
                dns_name = %ch.dns_name,
                uid = %ch.uid,
                reason = e.reason(),
                error = %e,
                "Challenge failed"
            );
            metrics::record_challenge_error(action, start.elapsed());
        }
    }
}

/// Look a zone up by name, turning "no unique match" into an error.
async fn find_zone(dns: &dyn DnsClient, zone_name: &str) -> Result<Zone, SolverError> {
    dns.load_zone_by_name(zone_name)
        .await
        .map_err(|e| SolverError::api("load zone", zone_name, e))?
        .ok_or_else(|| SolverError::ZoneNotFound {
            zone: zone_name.to_string(),
        })
}

/// Split a trailing-dot FQDN into its leading label and the remaining zone.
///
/// `_acme-challenge.example.org.` becomes `("_acme-challenge", "example.org")`.
///
/// # Errors
///
/// Returns [`SolverError::MalformedName`] unless the input is one non-empty
/// label, a dot, a non-empty remainder and a trailing dot.
pub fn extract_domain(fqdn: &str) -> Result<(String, String), SolverError> {
    let malformed = || SolverError::MalformedName {
        fqdn: fqdn.to_string(),
    };

    let trimmed = fqdn.strip_suffix('.').ok_or_else(malformed)?;
    let (label, zone) = trimmed.split_once('.').ok_or_else(malformed)?;

    // Same as `^([^.]+)\.(.+)\.$`, where `.` never matches a newline
    if label.is_empty() || zone.is_empty() || zone.contains('\n') {
        return Err(malformed());
    }

    Ok((label.to_string(), zone.to_string()))
}

/// Pick the TXT record to delete during clean-up.
///
/// Among TXT records named `name`, the last one whose value carries `key`
/// wins; without such a record the last one in listing order is used.
#[must_use]
pub fn select_challenge_record<'a>(
    records: &'a [Record],
    name: &str,
    key: &str,
) -> Option<&'a Record> {
    let mut last = None;
    let mut last_with_key = None;

    for record in records
        .iter()
        .filter(|r| r.name == name && r.record_type == RECORD_TYPE_TXT)
    {
        if record.value.trim_matches('"') == key {
            last_with_key = Some(record);
        }
        last = Some(record);
    }

    last_with_key.or(last)
}
