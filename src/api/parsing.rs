use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::core::models::InboundRequest;
use crate::errors::RelayError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of a proxy event (payload v2 first, then v1).
pub fn request_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
}

pub fn is_preflight(payload: &Value) -> bool {
    request_method(payload).is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS"))
}

/// Request body, base64-decoded when the proxy flagged it as such.
pub fn request_body(payload: &Value) -> Option<String> {
    let body = payload.get("body").and_then(Value::as_str)?;
    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if encoded {
        let bytes = STANDARD.decode(body).ok()?;
        String::from_utf8(bytes).ok()
    } else {
        Some(body.to_string())
    }
}

/// Extracts a non-empty `question` from the proxy event.
///
/// # Errors
///
/// Returns [`RelayError::InvalidQuestion`] for a missing, undecodable or malformed
/// body, and for a missing, non-string or empty `question`.
pub fn parse_question(payload: &Value) -> Result<String, RelayError> {
    let body = request_body(payload).ok_or(RelayError::InvalidQuestion)?;
    let request: InboundRequest =
        serde_json::from_str(&body).map_err(|_| RelayError::InvalidQuestion)?;
    request.into_question()
}
