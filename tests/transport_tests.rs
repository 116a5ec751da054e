mod common;

use std::time::Duration;

use common::{GOLDEN_AUTHORIZATION, MockTransport, Reply, relay_with};
use doubao_relay::RelayError;
use doubao_relay::clients::{ReqwestTransport, SignedRequest, Transport};
use doubao_relay::core::config::CHAT_COMPLETIONS_PATH;
use httpmock::prelude::*;
use url::Url;

const HELLO_BODY: &str = r#"{"model":"doubao-pro","messages":[{"role":"user","content":"hello"}],"temperature":0.7,"max_tokens":2000}"#;

/// Signed request for `hello`, redirected to `server`.
fn hello_request_for(server: &MockServer) -> SignedRequest {
    let relay = relay_with(MockTransport::new(Reply::Ok(200, "{}")));
    let mut request = relay.prepare("hello").unwrap();
    request.url = Url::parse(&server.url(CHAT_COMPLETIONS_PATH)).unwrap();
    request
}

fn transport() -> ReqwestTransport {
    ReqwestTransport::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_send_puts_signed_headers_and_exact_body_on_the_wire() {
    let server = MockServer::start_async().await;
    let reply = r#"{"choices":[{"message":{"content":"hi"}}]}"#;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHAT_COMPLETIONS_PATH)
                .header("content-type", "application/json")
                .header("x-date", "Mon, 01 Jan 2024 00:00:00 GMT")
                .header(
                    "x-content-sha256",
                    "hbn6TVENn8hN34l03S/X92vE1By6UKIIz2YfRptyCVM=",
                )
                .header("authorization", GOLDEN_AUTHORIZATION)
                .header("host", "open.volcengineapi.com")
                .body(HELLO_BODY);
            then.status(200)
                .header("content-type", "application/json")
                .body(reply);
        })
        .await;

    let response = transport().send(hello_request_for(&server)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, reply);
}

#[tokio::test]
async fn test_send_returns_non_success_status_and_body() {
    let server = MockServer::start_async().await;
    let error_body = r#"{"ResponseMetadata":{"Error":{"Code":"SignatureDoesNotMatch"}}}"#;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_COMPLETIONS_PATH);
            then.status(401).body(error_body);
        })
        .await;

    let response = transport().send(hello_request_for(&server)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 401);
    assert_eq!(response.body, error_body);
}

#[tokio::test]
async fn test_send_connection_error() {
    let server = MockServer::start_async().await;
    let mut request = hello_request_for(&server);
    // Nothing listens on port 1.
    request.url = Url::parse("http://127.0.0.1:1/api/v1/chat/completions").unwrap();

    let err = transport().send(request).await.unwrap_err();

    assert!(matches!(err, RelayError::HttpError(_)));
    assert_eq!(err.status_code(), 500);
}
