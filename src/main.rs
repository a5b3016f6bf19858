// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use hetzner_dns01::{
    config::SecretKeySelector,
    constants::{
        DEFAULT_DNS_API_TIMEOUT_SECS, DEFAULT_DNS_API_URL, DEFAULT_LISTEN_ADDRESS,
        TOKIO_WORKER_THREADS,
    },
    credentials::KubeResolverFactory,
    dns_api::HetznerClientFactory,
    solver::{HetznerSolver, Solver, SolverSettings},
    tls::{load_server_config, TlsListener},
    webhook::{router, WebhookState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// cert-manager DNS-01 webhook solver for Hetzner DNS
#[derive(Debug, Parser)]
#[command(name = "hetzner-dns01", version, about)]
struct Args {
    /// API group the webhook is registered under
    #[arg(long, env = "GROUP_NAME")]
    group_name: String,

    /// Hetzner DNS API base URL
    #[arg(long, env = "DNS_API_URL", default_value = DEFAULT_DNS_API_URL)]
    api_base_url: String,

    /// Secret name used when the issuer config omits one
    #[arg(long, env = "DNS_API_DEFAULT_SECRET_NAME", default_value = "")]
    api_key_secret_name: String,

    /// Secret key used when the issuer config omits one
    #[arg(long, env = "DNS_API_DEFAULT_SECRET_KEY", default_value = "")]
    api_key_secret_key: String,

    /// Address the webhook server listens on
    #[arg(long, env = "LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    listen_address: SocketAddr,

    /// PEM certificate chain served over HTTPS
    #[arg(long, env = "TLS_CERT_FILE")]
    tls_cert_file: Option<PathBuf>,

    /// PEM private key matching --tls-cert-file
    #[arg(long, env = "TLS_PRIVATE_KEY_FILE")]
    tls_private_key_file: Option<PathBuf>,

    /// Serve plain HTTP instead of HTTPS (TLS terminated elsewhere)
    #[arg(long, env = "INSECURE_HTTP")]
    insecure_http: bool,

    /// Per-request timeout for DNS API calls, in seconds
    #[arg(long, env = "DNS_API_TIMEOUT_SECS", default_value_t = DEFAULT_DNS_API_TIMEOUT_SECS)]
    request_timeout_secs: u64,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            bail!("GROUP_NAME must be specified");
        }
        if self.request_timeout_secs == 0 {
            bail!("DNS API request timeout must be greater than zero");
        }
        match (
            &self.tls_cert_file,
            &self.tls_private_key_file,
            self.insecure_http,
        ) {
            (Some(_), Some(_), false) | (None, None, true) => Ok(()),
            (Some(_), Some(_), true) => {
                bail!("--insecure-http cannot be combined with TLS certificate files")
            }
            (None, None, false) => bail!(
                "--tls-cert-file and --tls-private-key-file are required \
                 unless --insecure-http is set"
            ),
            _ => bail!("--tls-cert-file and --tls-private-key-file must be given together"),
        }
    }

    fn solver_settings(&self) -> SolverSettings {
        SolverSettings::new(SecretKeySelector::new(
            &self.api_key_secret_name,
            &self.api_key_secret_key,
        ))
    }
}

fn main() -> Result<()> {
    // Install rustls crypto provider before any TLS client or server is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    let args = Args::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("hetzner-dns01")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG (default INFO) and RUST_LOG_FORMAT=json|text
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Hetzner DNS-01 webhook solver");
    args.validate()?;

    debug!(
        group = %args.group_name,
        api_base_url = %args.api_base_url,
        default_secret = %args.api_key_secret_name,
        default_key = %args.api_key_secret_key,
        timeout_secs = args.request_timeout_secs,
        "Configuration loaded"
    );

    let dns_factory = HetznerClientFactory::new(
        &args.api_base_url,
        Duration::from_secs(args.request_timeout_secs),
    )?;

    let mut solver = HetznerSolver::new(
        args.solver_settings(),
        Arc::new(KubeResolverFactory),
        Arc::new(dns_factory),
    );

    debug!("Loading Kubernetes client configuration");
    let kube_config = kube::Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    solver.initialize(kube_config)?;

    let state = Arc::new(WebhookState::new(args.group_name.clone(), Arc::new(solver)));

    let listener = tokio::net::TcpListener::bind(args.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen_address))?;
    let app = router(state);

    if let (Some(cert), Some(key)) = (&args.tls_cert_file, &args.tls_private_key_file) {
        let tls_config =
            load_server_config(cert, key).context("Failed to load TLS certificate")?;
        let listener = TlsListener::new(listener, Arc::new(tls_config))?;
        info!(
            address = %args.listen_address,
            group = %args.group_name,
            "Webhook listening (HTTPS)"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        warn!("Serving plain HTTP, TLS must be terminated in front of the webhook");
        info!(
            address = %args.listen_address,
            group = %args.group_name,
            "Webhook listening (HTTP)"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    info!("Graceful shutdown completed successfully");
    Ok(())
}

/// Resolve once SIGTERM (pod termination) or SIGINT (Ctrl+C) arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM (pod termination), initiating graceful shutdown...");
        }
    }
}
