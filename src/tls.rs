// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TLS for the webhook server.
//!
//! The Kubernetes API aggregator only talks to an `APIService` backend over
//! HTTPS, so the webhook terminates TLS itself. [`load_server_config`] reads a
//! PEM certificate chain and private key, and [`TlsListener`] hands
//! handshaken streams to `axum::serve`.
//!
//! All TLS in the process (the kube client, reqwest and the server) uses the
//! `ring` provider. Install it once with [`ensure_crypto_provider`] before any
//! client is built.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, warn};

use crate::constants::{TLS_ACCEPT_BACKLOG, TLS_HANDSHAKE_TIMEOUT_SECS};

/// Errors raised while building the server TLS configuration.
#[derive(Error, Debug)]
pub enum TlsError {
    /// A PEM file could not be read or parsed
    #[error("failed to read {kind} from {path}: {reason}")]
    Pem {
        /// What was being read (`certificate` or `private key`)
        kind: &'static str,
        /// File path
        path: PathBuf,
        /// Underlying PEM or I/O error
        reason: String,
    },

    /// The certificate file holds no certificate
    #[error("no certificate found in {path}")]
    NoCertificate {
        /// File path
        path: PathBuf,
    },

    /// rustls rejected the certificate and key pair
    #[error("invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// Install `ring` as the process-wide rustls provider.
///
/// A provider that is already installed is left in place.
pub fn ensure_crypto_provider() {
    // Err only means a provider is already set.
    let _ = CryptoProvider::install_default(rustls::crypto::ring::default_provider());
}

/// Build a server config from a PEM certificate chain and private key.
///
/// ALPN advertises HTTP/2 and HTTP/1.1.
///
/// # Errors
///
/// Returns [`TlsError`] if either file is unreadable, the certificate file is
/// empty, or the key does not match the certificate.
pub fn load_server_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<ServerConfig, TlsError> {
    let certs = CertificateDer::pem_file_iter(cert_path)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|e| TlsError::Pem {
            kind: "certificate",
            path: cert_path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificate {
            path: cert_path.to_path_buf(),
        });
    }

    let key = PrivateKeyDer::from_pem_file(key_path).map_err(|e| TlsError::Pem {
        kind: "private key",
        path: key_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut config =
        ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(config)
}

/// TCP listener that yields TLS streams to `axum::serve`.
///
/// Handshakes run on their own tasks, so a slow or failing client never holds
/// up other connections.
pub struct TlsListener {
    local_addr: SocketAddr,
    incoming: mpsc::Receiver<(TlsStream<TcpStream>, SocketAddr)>,
}

impl TlsListener {
    /// Start accepting TLS connections on `listener`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener has no local address.
    pub fn new(listener: TcpListener, config: Arc<ServerConfig>) -> io::Result<Self> {
        let local_addr = listener.local_addr()?;
        let (tx, incoming) = mpsc::channel(TLS_ACCEPT_BACKLOG);
        tokio::spawn(accept_loop(listener, TlsAcceptor::from(config), tx));
        Ok(Self {
            local_addr,
            incoming,
        })
    }
}

impl axum::serve::Listener for TlsListener {
    type Io = TlsStream<TcpStream>;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        match self.incoming.recv().await {
            Some(conn) => conn,
            // The accept loop only exits once this receiver is gone.
            None => std::future::pending().await,
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        Ok(self.local_addr)
    }
}

async fn accept_loop(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    tx: mpsc::Sender<(TlsStream<TcpStream>, SocketAddr)>,
) {
    let handshake_timeout = Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS);

    while !tx.is_closed() {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match tokio::time::timeout(handshake_timeout, acceptor.accept(stream)).await {
                Ok(Ok(tls_stream)) => {
                    let _ = tx.send((tls_stream, peer)).await;
                }
                Ok(Err(e)) => debug!(peer = %peer, error = %e, "TLS handshake failed"),
                Err(_) => debug!(peer = %peer, "TLS handshake timed out"),
            }
        });
    }
}
