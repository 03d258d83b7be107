//! Integration tests for the Kion client using wiremock
//!
//! These tests verify the client behavior against mocked endpoints,
//! ensuring proper handling of various response codes and edge cases.

use kion_client::filter::{FilterSpec, Filterable};
use kion_client::kion::fetcher::fetch_filtered;
use kion_client::kion::labels::{put_app_label_ids, read_resource_labels, LabelError};
use kion_client::kion::models::{AssociateLabel, ListResponse};
use kion_client::{KionClient, RequestError};
use serde_json::{json, Value};
use std::collections::HashMap;
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> KionClient {
    KionClient::new(&server.uri(), "app_1_test", "/api", false)
}

/// Test module for the verb operations
mod http_client_tests {
    use super::*;

    /// Test successful GET request decodes JSON and sends the bearer token
    #[tokio::test]
    async fn test_get_success_returns_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/webhook"))
            .and(bearer_token("app_1_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 1, "name": "deploy"},
                    {"id": 2, "name": "audit"}
                ],
                "status": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response: ListResponse<Value> = client.get("/v3/webhook").await.unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0]["name"], "deploy");
        assert_eq!(response.status, 200);
    }

    /// Test 404 response becomes an HTTP error naming method, URL and body
    #[tokio::test]
    async fn test_404_returns_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/account/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("account not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get::<Value>("/v3/account/99").await.unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert!(err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("GET"), "{msg}");
        assert!(msg.contains(&format!("{}/api/v3/account/99", server.uri())), "{msg}");
        assert!(msg.contains("account not found"), "{msg}");
    }

    /// Test 401 response keeps its status
    #[tokio::test]
    async fn test_401_returns_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "invalid api key",
                "status": 401
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get::<Value>("/v3/me").await.unwrap_err();

        assert!(matches!(err, RequestError::Http { status: 401, .. }));
    }

    /// Test malformed JSON in a 200 response is a decode error with status 200
    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/label/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get::<Value>("/v3/label/1").await.unwrap_err();

        assert!(matches!(err, RequestError::Decode { status: 200, .. }));
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    /// Test any 2xx status counts as success
    #[tokio::test]
    async fn test_accepted_status_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v3/project/4"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .patch("/v3/project/4", &json!({"name": "renamed"}))
            .await
            .unwrap();
    }

    /// Test POST sends a JSON body and returns the creation envelope
    #[tokio::test]
    async fn test_post_returns_creation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v3/label"))
            .and(bearer_token("app_1_test"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"key": "team", "value": "platform", "color": "#ff0000"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"record_id": 17, "status": 201})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .post(
                "/v3/label",
                &json!({"key": "team", "value": "platform", "color": "#ff0000"}),
            )
            .await
            .unwrap();

        assert_eq!(created.record_id, 17);
        assert_eq!(created.status, 201);
    }

    /// Test PUT sends the body and ignores the response
    #[tokio::test]
    async fn test_put_request() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v3/funding-source/3/owner"))
            .and(body_json(json!({"owner_user_ids": [1, 2]})))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .put(
                "/v3/funding-source/3/owner",
                &json!({"owner_user_ids": [1, 2]}),
            )
            .await
            .unwrap();
    }

    /// Test query parameters are applied to GET requests
    #[tokio::test]
    async fn test_get_with_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/iam-policy"))
            .and(query_param("query", "admin"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"items": [], "total": 0},
                "status": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut params = HashMap::new();
        params.insert("query".to_string(), "admin".to_string());
        params.insert("page".to_string(), "2".to_string());

        let response: Value = client
            .get_with_params("/v4/iam-policy?page=1", &params)
            .await
            .unwrap();

        assert_eq!(response["data"]["total"], 0);
    }

    /// Test DELETE without a body
    #[tokio::test]
    async fn test_delete_request() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v3/webhook/8"))
            .and(bearer_token("app_1_test"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete("/v3/webhook/8").await.unwrap();
    }

    /// Test DELETE with a body, as used to remove owners
    #[tokio::test]
    async fn test_delete_with_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v3/project/4/owner"))
            .and(body_json(json!({"owner_user_ids": [7]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .delete_with_body("/v3/project/4/owner", &json!({"owner_user_ids": [7]}))
            .await
            .unwrap();
    }

    /// Test DELETE decoding a response payload
    #[tokio::test]
    async fn test_delete_with_response() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v3/ou/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"removed": true},
                "status": 200
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response: Value = client
            .delete_with_response::<Value, _>("/v3/ou/2", None)
            .await
            .unwrap();

        assert_eq!(response["data"]["removed"], true);
    }

    /// Test DELETE response decode failure keeps the status
    #[tokio::test]
    async fn test_delete_with_response_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v3/ou/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{broken"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .delete_with_response::<Value, Value>("/v3/ou/2", Some(&json!({"force": true})))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 200);
        assert!(matches!(err, RequestError::Decode { .. }));
    }

    /// Test an unreachable server is a transport error with status 0
    #[tokio::test]
    async fn test_transport_error_has_status_zero() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = KionClient::new(&format!("http://127.0.0.1:{port}"), "app_1_test", "/api", false);
        let err = client.get::<Value>("/v3/webhook").await.unwrap_err();

        assert!(matches!(err, RequestError::Transport { .. }));
        assert_eq!(err.status_code(), 0);
    }

    /// Test the API path and request path join with a single slash
    #[tokio::test]
    async fn test_base_path_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/kion/api/v3/app-config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = KionClient::new(&format!("{}/kion/", server.uri()), "k", "/api/", false);
        let _: Value = client.get("/v3/app-config").await.unwrap();
    }
}

/// Tests for label associations
mod label_tests {
    use super::*;

    /// Test labels are written with PUT to the resource's labels endpoint
    #[tokio::test]
    async fn test_put_labels() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v3/project/12/labels"))
            .and(body_json(json!({"labels": [{"key": "env", "value": "prod"}]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        put_app_label_ids(
            &client,
            vec![AssociateLabel {
                key: "env".to_string(),
                value: "prod".to_string(),
            }],
            "project",
            "12",
        )
        .await
        .unwrap();
    }

    /// Test labels read back as a key/value map
    #[tokio::test]
    async fn test_read_labels() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/ou/5/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 1, "key": "env", "value": "prod", "color": "#00ff00"},
                    {"id": 2, "key": "team", "value": "platform"}
                ],
                "status": 200
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let labels = read_resource_labels(&client, "ou", "5").await.unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels["env"], "prod");
        assert_eq!(labels["team"], "platform");
    }

    /// Test unsupported resource types never reach the server
    #[tokio::test]
    async fn test_unsupported_type_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = read_resource_labels(&client, "webhook", "1").await.unwrap_err();

        assert!(matches!(err, LabelError::UnsupportedResourceType(_)));
    }
}

/// Tests for filtered list reads
mod fetcher_tests {
    use super::*;

    async fn mount_accounts(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v3/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 1, "name": "prod-core", "owner_users": [{"id": 3}]},
                    {"id": 2, "name": "dev-sandbox", "owner_users": [{"id": 4}]},
                    {"id": 3, "name": "prod-edge", "owner_users": [{"id": 4}, {"id": 5}]}
                ],
                "status": 200
            })))
            .mount(server)
            .await;
    }

    /// Test filters narrow the list and keep server order
    #[tokio::test]
    async fn test_fetch_filtered() {
        let server = MockServer::start().await;
        mount_accounts(&server).await;

        let filterable = Filterable::new(vec![
            FilterSpec {
                name: "name".to_string(),
                values: vec!["^prod-".to_string()],
                regex: true,
            },
            FilterSpec {
                name: "owner_users.id".to_string(),
                values: vec!["4".to_string()],
                regex: false,
            },
        ]);

        let client = client_for(&server);
        let records = fetch_filtered(&client, "/v3/account", &HashMap::new(), "data", &filterable)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "prod-edge");
    }

    /// Test no filters returns everything
    #[tokio::test]
    async fn test_fetch_unfiltered() {
        let server = MockServer::start().await;
        mount_accounts(&server).await;

        let client = client_for(&server);
        let records = fetch_filtered(
            &client,
            "/v3/account",
            &HashMap::new(),
            "data",
            &Filterable::empty(),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    /// Test a misconfigured filter path is reported, not treated as no match
    #[tokio::test]
    async fn test_fetch_with_bad_filter_key() {
        let server = MockServer::start().await;
        mount_accounts(&server).await;

        let filterable = Filterable::new(vec![FilterSpec {
            name: "nickname".to_string(),
            values: vec!["x".to_string()],
            regex: false,
        }]);

        let client = client_for(&server);
        let err = fetch_filtered(&client, "/v3/account", &HashMap::new(), "data", &filterable)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("filter not found: nickname"));
    }
}
