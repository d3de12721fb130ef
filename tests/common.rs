#![allow(dead_code)]

use linepay::LinePayApi;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::{MockServer, Request, ResponseTemplate};

pub const CHANNEL_ID: &str = "channel_id";
pub const CHANNEL_SECRET: &str = "channel_secret";
pub const NONCE: &str = "021a6bb9-ed18-4562-b9bd-ad07a27532f6";

/// A client pointed at `server` that always signs with [`NONCE`].
pub fn test_api(server: &MockServer) -> LinePayApi {
    LinePayApi::builder()
        .channel_id(CHANNEL_ID.to_string())
        .channel_secret(CHANNEL_SECRET.to_string())
        .is_sandbox(true)
        .api_endpoint(server.uri())
        .nonce_generator(Arc::new(|| NONCE.to_string()))
        .build()
        .unwrap()
}

pub fn success_response(info: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "returnCode": "0000",
        "returnMessage": "Success.",
        "info": info,
    }))
}

pub fn error_response(return_code: &str, return_message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "returnCode": return_code,
        "returnMessage": return_message,
    }))
}

/// The single request the mock server received.
pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

pub fn header<'a>(request: &'a Request, name: &str) -> &'a str {
    request
        .headers
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
}

/// Asserts that the signature header matches the bytes actually sent.
pub fn assert_signed_payload(api: &LinePayApi, request: &Request, payload: &str) {
    let expected = api
        .signer()
        .signature(request.url.path(), payload, NONCE)
        .unwrap();

    assert_eq!(header(request, "X-LINE-Authorization-Nonce"), NONCE);
    assert_eq!(header(request, "X-LINE-Authorization"), expected);
}
