//! Integration tests for the request client against a mock API server.

use oai_client::{ClientError, RequestClient, TransportOptions};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RequestClient {
    let options = TransportOptions::new("test-key").with_base_url(format!("{}/v1", server.uri()));
    RequestClient::new(options).unwrap()
}

#[tokio::test]
async fn test_success_resolves_to_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({"input": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .request("embeddings", Some(json!({"input": "hi"})))
        .await
        .unwrap();
    assert_eq!(result, json!({"a": 1}));
}

#[tokio::test]
async fn test_missing_body_is_sent_as_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).request("POST moderations", None).await.unwrap();
    assert_eq!(result, json!({"ok": true}));
}

#[tokio::test]
async fn test_verb_from_descriptor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).request("GET models", None).await.unwrap();
    assert_eq!(result, json!({"data": []}));
}

#[tokio::test]
async fn test_error_status_rejects_with_decoded_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "x"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .request("chat/completions", Some(json!({})))
        .await
        .unwrap_err();

    assert_eq!(err.api_body(), Some(&json!({"error": "x"})));
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_error_status_with_unparsable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .request("chat/completions", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"a\":"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).request("completions", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn test_extra_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("openai-organization", "org-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = TransportOptions::new("test-key")
        .with_base_url(format!("{}/v1", mock_server.uri()))
        .with_header("OpenAI-Organization".to_string(), "org-123".to_string());
    let client = RequestClient::new(options).unwrap();

    assert_eq!(client.request("GET models", None).await.unwrap(), json!({}));
}
