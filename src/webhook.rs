// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! cert-manager webhook HTTP surface.
//!
//! cert-manager reaches external solvers through the aggregated API server,
//! which forwards `ChallengePayload` objects to this process:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/apis/{group}/v1alpha1/{solver}` | Present or clean up a challenge |
//! | `GET` | `/apis/{group}/v1alpha1` | API discovery |
//! | `GET` | `/healthz` | Liveness |
//! | `GET` | `/metrics` | Prometheus exposition |
//!
//! Solver failures are reported inside the response envelope with HTTP 200;
//! cert-manager reads `response.success` and `response.status`, not the HTTP
//! status.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};
use std::sync::Arc;
use tracing::{debug, error};

use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
use crate::constants::{
    CHALLENGE_PAYLOAD_KIND, HEALTH_PATH, METRICS_SERVER_PATH, WEBHOOK_API_VERSION,
};
use crate::metrics;
use crate::solver::Solver;
use crate::status_reasons::{REASON_MISSING_REQUEST, REASON_UNKNOWN_ACTION};

/// Shared state of the webhook handlers.
pub struct WebhookState {
    /// API group the webhook is registered under (e.g., `acme.example.com`)
    pub group_name: String,
    /// The solver serving challenges
    pub solver: Arc<dyn Solver>,
}

impl WebhookState {
    /// Wrap a solver for the given API group.
    #[must_use]
    pub fn new(group_name: impl Into<String>, solver: Arc<dyn Solver>) -> Self {
        Self {
            group_name: group_name.into(),
            solver,
        }
    }

    fn group_version(&self) -> String {
        format!("{}/{WEBHOOK_API_VERSION}", self.group_name)
    }
}

/// Build the webhook router.
pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(
            &format!("/apis/{{group}}/{WEBHOOK_API_VERSION}/{{solver}}"),
            post(handle_challenge),
        )
        .route(
            &format!("/apis/{{group}}/{WEBHOOK_API_VERSION}"),
            get(handle_discovery),
        )
        .route(HEALTH_PATH, get(handle_health))
        .route(METRICS_SERVER_PATH, get(handle_metrics))
        .with_state(state)
}

/// `POST /apis/{group}/v1alpha1/{solver}`
pub async fn handle_challenge(
    State(state): State<Arc<WebhookState>>,
    Path((group, solver)): Path<(String, String)>,
    Json(payload): Json<ChallengePayload>,
) -> Response {
    if group != state.group_name || solver != state.solver.name() {
        debug!(group = %group, solver = %solver, "Unknown solver resource");
        return (
            StatusCode::NOT_FOUND,
            format!("solver {solver} not served under group {group}"),
        )
            .into_response();
    }

    let response = dispatch(state.solver.as_ref(), payload.request).await;
    Json(ChallengePayload::reply(response)).into_response()
}

/// Run the action a challenge request asks for and build the reply.
pub async fn dispatch(solver: &dyn Solver, request: Option<ChallengeRequest>) -> ChallengeResponse {
    let Some(ch) = request else {
        return ChallengeResponse::failure(
            "",
            REASON_MISSING_REQUEST,
            "challenge payload carries no request".to_string(),
        );
    };

    debug!(
        uid = %ch.uid,
        action = ch.action.as_str(),
        fqdn = %ch.resolved_fqdn,
        "Received challenge"
    );

    let result = match ch.action {
        ChallengeAction::Present => solver.present(&ch).await,
        ChallengeAction::CleanUp => solver.clean_up(&ch).await,
        ChallengeAction::Unknown => {
            return ChallengeResponse::failure(
                &ch.uid,
                REASON_UNKNOWN_ACTION,
                "unsupported challenge action".to_string(),
            );
        }
    };

    match result {
        Ok(()) => ChallengeResponse::success(&ch.uid),
        Err(e) => ChallengeResponse::failure(&ch.uid, e.reason(), e.to_string()),
    }
}

/// `GET /apis/{group}/v1alpha1`
pub async fn handle_discovery(
    State(state): State<Arc<WebhookState>>,
    Path(group): Path<String>,
) -> Response {
    if group != state.group_name {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(discovery_document(&state)).into_response()
}

/// Resource list advertising the solver as a create-only resource.
#[must_use]
pub fn discovery_document(state: &WebhookState) -> APIResourceList {
    let name = state.solver.name().to_string();
    APIResourceList {
        group_version: state.group_version(),
        resources: vec![APIResource {
            name: name.clone(),
            singular_name: name,
            namespaced: false,
            kind: CHALLENGE_PAYLOAD_KIND.to_string(),
            verbs: vec!["create".to_string()],
            ..Default::default()
        }],
    }
}

/// `GET /healthz`
pub async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// `GET /metrics`
pub async fn handle_metrics() -> Response {
    match metrics::gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
