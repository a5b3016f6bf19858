// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Authenticated request helper shared by all DNS API operations.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, StatusCode};
use tracing::{debug, error, warn};

use crate::constants::AUTH_API_TOKEN_HEADER;
use crate::dns_errors::DnsApiError;
use crate::http_errors::{map_connection_error, map_http_error_to_reason};
use crate::metrics;

/// Form-encode a query value or path segment (space becomes `+`).
pub(crate) fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Execute a single request against the DNS API.
///
/// Every request carries the API token and a JSON content type. Only HTTP 200
/// counts as success; any other status becomes [`DnsApiError::ApiStatus`]
/// after the response, its headers and the outgoing body have been logged.
/// There is no retry: the caller decides what a failure means.
///
/// A response body that cannot be read is treated as empty so the
/// status-derived error is what the caller sees.
///
/// # Arguments
/// * `client` - HTTP client
/// * `api_key` - Raw API token
/// * `method` - HTTP method
/// * `url` - Full URL of the endpoint
/// * `body` - Optional JSON body
///
/// # Errors
///
/// Returns [`DnsApiError::Transport`] when no response was received and
/// [`DnsApiError::ApiStatus`] for any status other than 200.
pub(crate) async fn dns_api_request(
    client: &HttpClient,
    api_key: &str,
    method: Method,
    url: &str,
    body: Option<Vec<u8>>,
) -> Result<String, DnsApiError> {
    debug!(
        method = %method,
        url = %url,
        has_body = body.is_some(),
        "HTTP API request to DNS API"
    );

    let mut request = client
        .request(method.clone(), url)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTH_API_TOKEN_HEADER, api_key);
    if let Some(bytes) = &body {
        request = request.body(bytes.clone());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            let (reason, message) = map_connection_error();
            error!(
                method = %method,
                url = %url,
                reason = reason,
                error = %e,
                "{message}"
            );
            metrics::record_dns_api_request(method.as_str(), "error");
            return Err(DnsApiError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                reason: e.to_string(),
            });
        }
    };

    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await.unwrap_or_else(|e| {
        warn!(
            method = %method,
            url = %url,
            status = %status,
            error = %e,
            "Failed to read DNS API response body"
        );
        String::new()
    });

    metrics::record_dns_api_request(method.as_str(), status.as_str());

    if status != StatusCode::OK {
        let (reason, message) = map_http_error_to_reason(status.as_u16());
        let request_body = body
            .as_deref()
            .map(String::from_utf8_lossy)
            .unwrap_or_default();
        error!(
            method = %method,
            url = %url,
            status = %status,
            reason = reason,
            body = %text,
            headers = ?headers,
            request_body = %request_body,
            "HTTP request failed: {message}"
        );
        return Err(DnsApiError::ApiStatus {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    debug!(
        method = %method,
        url = %url,
        status = %status,
        response_len = text.len(),
        "HTTP API request successful"
    );

    Ok(text)
}
