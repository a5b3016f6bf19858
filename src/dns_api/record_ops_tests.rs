// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for record operations (`create_record`, `delete_record`, `load_records`).

#[cfg(test)]
mod tests {
    use crate::dns_api::record_ops::{create_record, delete_record, load_records};
    use crate::dns_api::RecordInfo;
    use crate::dns_errors::DnsApiError;
    use reqwest::Client as HttpClient;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn aaaa_info() -> RecordInfo {
        RecordInfo {
            record_type: "AAAA".to_string(),
            name: "mail".to_string(),
            value: "127.0.0.1".to_string(),
            ttl: 1234,
        }
    }

    // =====================================================
    // create_record
    // =====================================================

    #[tokio::test]
    async fn test_create_record_returns_provider_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records"))
            .and(header("Auth-API-Token", "abc123"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "zone_id": "someZoneIdentifier",
                "type": "AAAA",
                "name": "mail",
                "value": "127.0.0.1",
                "ttl": 1234
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "record": {
                    "type": "A",
                    "id": "the_id",
                    "created": "2021-08-18T13:08:19Z",
                    "modified": "2021-09-13T10:18:29Z",
                    "zone_id": "the_zone_id",
                    "name": "a_name",
                    "value": "127.0.0.1",
                    "ttl": 123
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let record = create_record(
            &HttpClient::new(),
            "abc123",
            &base_url,
            "someZoneIdentifier",
            &aaaa_info(),
        )
        .await
        .unwrap();

        assert_eq!(record.id, "the_id");
        assert_eq!(record.record_type, "A");
        assert_eq!(record.zone_id, "the_zone_id");
        assert_eq!(record.name, "a_name");
        assert_eq!(record.value, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_create_record_rejected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records"))
            .respond_with(
                ResponseTemplate::new(422).set_body_string(r#"{"error":{"message":"invalid value"}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = create_record(&HttpClient::new(), "abc123", &base_url, "Z1", &aaaa_info())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(422));
        assert!(err.url().unwrap().ends_with("/api/v1/records"));
        assert!(err.to_string().contains("POST"));
    }

    #[tokio::test]
    async fn test_create_record_non_200_success_status_is_error() {
        // Only 200 counts as success, even for other 2xx codes
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "record": { "id": "X", "type": "TXT", "zone_id": "Z1", "name": "n", "value": "v" }
            })))
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = create_record(&HttpClient::new(), "abc123", &base_url, "Z1", &aaaa_info())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(201));
    }

    #[tokio::test]
    async fn test_create_record_missing_record_in_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = create_record(&HttpClient::new(), "abc123", &base_url, "Z1", &aaaa_info())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DnsApiError::Decode {
                operation: "createRecord",
                ..
            }
        ));
    }

    // =====================================================
    // delete_record
    // =====================================================

    #[tokio::test]
    async fn test_delete_record_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/records/Z0n31dz0Ne"))
            .and(header("Auth-API-Token", "abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        delete_record(&HttpClient::new(), "abc123", &base_url, "Z0n31dz0Ne")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_record_not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/records/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"record not found"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = delete_record(&HttpClient::new(), "abc123", &base_url, "missing")
            .await
            .unwrap_err();

        match err {
            DnsApiError::ApiStatus { method, status, .. } => {
                assert_eq!(method, "DELETE");
                assert_eq!(status, 404);
            }
            other => panic!("expected ApiStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_record_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/records/R1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = delete_record(&HttpClient::new(), "abc123", &base_url, "R1")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(503));
        // `expect(1)` is verified when the server is dropped
    }

    // =====================================================
    // load_records
    // =====================================================

    #[tokio::test]
    async fn test_load_records_in_provider_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/records"))
            .and(query_param("zone_id", "xxxZZZ111"))
            .and(header("Auth-API-Token", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    { "type": "A", "id": "WR0N51D", "zone_id": "xxxZZZ111", "name": "some_host", "value": "8.8.8.8", "ttl": 300 },
                    { "type": "TXT", "id": "R3c0RdiD", "zone_id": "xxxZZZ111", "name": "_acme-challenge", "value": "ABCsecretlySigned" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let records = load_records(&HttpClient::new(), "abc123", &base_url, "xxxZZZ111")
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "WR0N51D");
        assert_eq!(records[1].id, "R3c0RdiD");
        assert_eq!(records[1].record_type, "TXT");
        assert_eq!(records[1].zone_id, "xxxZZZ111");
    }

    #[tokio::test]
    async fn test_load_records_empty_zone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let records = load_records(&HttpClient::new(), "abc123", &base_url, "Z1")
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_load_records_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/records"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/api", server.uri());
        let err = load_records(&HttpClient::new(), "abc123", &base_url, "Z1")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(403));
        assert!(err.url().unwrap().ends_with("/api/v1/records?zone_id=Z1"));
    }
}
