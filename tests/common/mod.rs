// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use hetzner_dns01::{
    config::SecretKeySelector,
    credentials::KubeResolverFactory,
    dns_api::HetznerClientFactory,
    solver::{HetznerSolver, Solver, SolverSettings},
    tls::{ensure_crypto_provider, load_server_config, TlsListener},
    webhook::{router, WebhookState},
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GROUP_NAME: &str = "acme.example.com";
pub const API_KEY: &str = "some-api-key";

/// Secret `namespace/name` holding `value` under `key`, as the API server returns it.
pub fn secret_json(namespace: &str, name: &str, key: &str, value: &str) -> Value {
    let mut data = BTreeMap::new();
    data.insert(key.to_string(), ByteString(value.as_bytes().to_vec()));
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    };
    serde_json::to_value(&secret).expect("secret serializes")
}

/// Fake Kubernetes API serving one secret.
pub async fn start_fake_apiserver_with(
    namespace: &str,
    secret_name: &str,
    key: &str,
    value: &str,
) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v1/namespaces/{namespace}/secrets/{secret_name}"
        )))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(secret_json(
                namespace,
                secret_name,
                key,
                value,
            )),
        )
        .mount(&server)
        .await;
    server
}

/// Fake Kubernetes API serving `secret_name` with `key` = [`API_KEY`].
pub async fn start_fake_apiserver(namespace: &str, secret_name: &str, key: &str) -> MockServer {
    start_fake_apiserver_with(namespace, secret_name, key, API_KEY).await
}

/// Run the webhook on an ephemeral port against a fake DNS API.
pub async fn start_webhook(apiserver: &MockServer, dns_api: &MockServer) -> SocketAddr {
    start_webhook_with_base(apiserver, &format!("{}/api/", dns_api.uri())).await
}

/// Solver state wired to the fake API server and the DNS API at `api_base_url`.
fn webhook_state(apiserver: &MockServer, api_base_url: &str) -> Arc<WebhookState> {
    ensure_crypto_provider();
    let dns_factory = HetznerClientFactory::new(api_base_url, Duration::from_secs(30))
        .expect("DNS client factory");

    let mut solver = HetznerSolver::new(
        SolverSettings::new(SecretKeySelector::new("key-name", "key-key")),
        Arc::new(KubeResolverFactory),
        Arc::new(dns_factory),
    );
    solver
        .initialize(kube::Config::new(
            apiserver.uri().parse().expect("apiserver uri"),
        ))
        .expect("solver initialization");

    Arc::new(WebhookState::new(GROUP_NAME, Arc::new(solver)))
}

/// Run the webhook on an ephemeral port against the DNS API at `api_base_url`.
pub async fn start_webhook_with_base(apiserver: &MockServer, api_base_url: &str) -> SocketAddr {
    let state = webhook_state(apiserver, api_base_url);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind webhook listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("webhook server");
    });

    addr
}

/// Run the webhook over HTTPS with the certificate in `tests/fixtures/tls`.
pub async fn start_webhook_tls(apiserver: &MockServer, dns_api: &MockServer) -> SocketAddr {
    let state = webhook_state(apiserver, &format!("{}/api/", dns_api.uri()));
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tls");
    let tls_config = load_server_config(&fixtures.join("cert.pem"), &fixtures.join("key.pem"))
        .expect("TLS fixture");
    let tcp = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind webhook listener");
    let addr = tcp.local_addr().expect("local addr");
    let listener = TlsListener::new(tcp, Arc::new(tls_config)).expect("TLS listener");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("webhook server");
    });

    addr
}

/// Build a `ChallengePayload` request body.
pub fn challenge_payload(action: &str, config: Option<Value>) -> Value {
    let mut request = json!({
        "uid": "keeMie5akeeMie5a",
        "action": action,
        "type": "dns-01",
        "dnsName": "example.org",
        "key": "ABCsecretlySigned",
        "resourceNamespace": "default",
        "resolvedFQDN": "_acme-challenge.example.org.",
        "resolvedZone": "example.org.",
        "allowAmbientCredentials": false
    });
    if let Some(config) = config {
        request["config"] = config;
    }
    json!({
        "apiVersion": "webhook.acme.cert-manager.io/v1alpha1",
        "kind": "ChallengePayload",
        "request": request
    })
}

/// POST a payload to the solver endpoint and decode the reply.
pub async fn post_challenge(addr: SocketAddr, solver: &str, payload: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!(
            "http://{addr}/apis/{GROUP_NAME}/v1alpha1/{solver}"
        ))
        .json(payload)
        .send()
        .await
        .expect("webhook request");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}
