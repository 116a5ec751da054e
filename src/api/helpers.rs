//! Response builders for the Lambda proxy integration.
//!
//! Every response carries the CORS headers so browsers can call the function directly.

use serde_json::value::RawValue;
use serde_json::{Value, json};

use crate::errors::RelayError;

pub const INVOCATION_FAILED: &str = "function invocation failed";

fn cors_headers(json_body: bool) -> Value {
    let mut headers = json!({
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    });
    if json_body {
        headers["Content-Type"] = json!("application/json");
    }
    headers
}

/// Returns a 200 OK response with no body, used for CORS preflight.
#[must_use]
pub fn ok_empty() -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(false),
        "body": ""
    })
}

/// Returns a 200 OK response carrying `body` as-is.
#[must_use]
pub fn ok_json(body: &RawValue) -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(true),
        "body": body.get()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(true),
        "body": json!({ "error": message }).to_string()
    })
}

/// Returns the failure envelope `{error, detail}`.
#[must_use]
pub fn err_detail_response(status_code: u16, detail: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(true),
        "body": json!({ "error": INVOCATION_FAILED, "detail": detail }).to_string()
    })
}

/// Maps a relay error to its HTTP response.
#[must_use]
pub fn from_error(error: &RelayError) -> Value {
    match error {
        RelayError::InvalidQuestion => err_response(400, &error.to_string()),
        _ => err_detail_response(error.status_code(), &error.to_string()),
    }
}
