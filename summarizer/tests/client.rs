//! Integration tests for the summary service client against a mock server.

#![allow(clippy::unwrap_used)]

use debrisflow_summarizer::{SummarizeRequest, SummarizerClient, SummarizerError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SummarizerClient {
    SummarizerClient::new("test-key".to_string()).with_api_url(server.uri())
}

#[tokio::test]
async fn summarize_returns_summary_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "summary": "Cleanup is 65% complete with 3 open errors."
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .summarize(SummarizeRequest::new("details", "changes"))
        .await
        .unwrap();

    assert_eq!(response.summary, "Cleanup is 65% complete with 3 open errors.");
}

#[tokio::test]
async fn summarize_maps_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .summarize(SummarizeRequest::new("details", "changes"))
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::Unauthorized));
}

#[tokio::test]
async fn summarize_maps_server_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream model unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .summarize(SummarizeRequest::new("details", "changes"))
        .await
        .unwrap_err();

    match err {
        SummarizerError::ServiceError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream model unavailable");
        },
        other => panic!("expected ServiceError, got {other:?}"),
    }
}

#[tokio::test]
async fn summarize_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .summarize(SummarizeRequest::new("details", "changes"))
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::ResponseParseFailed(_)));
}
