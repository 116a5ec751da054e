//! HMAC-SHA256 request signing for the Volcengine open API.
//!
//! Signing runs in four steps:
//!
//! 1. Hash the request body (`X-Content-Sha256`, base64 of SHA-256).
//! 2. Build the canonical request from method, path, the four signed headers and the body hash.
//! 3. Build the string to sign from the timestamp, credential scope and canonical request hash.
//! 4. Derive a date-scoped key from the secret key and sign the string with it.
//!
//! The main entry point is [`sign`].

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::core::config::{Credentials, Endpoint};

pub const ALGORITHM: &str = "HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json";
pub const METHOD: &str = "POST";
pub const SIGNED_HEADERS: &str = "content-type;host;x-content-sha256;x-date";

const X_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const DATE_STAMP_FORMAT: &str = "%Y%m%d";

type HmacSha256 = Hmac<Sha256>;

/// Values that feed the canonical request, fixed for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext {
    /// RFC 1123 timestamp sent as `X-Date`.
    pub timestamp: String,
    /// `YYYYMMDD` of the same instant.
    pub date_stamp: String,
    pub region: String,
    pub service: String,
    pub host: String,
    pub path: String,
    pub method: String,
    /// Base64 SHA-256 of the body.
    pub body_hash: String,
}

impl SignatureContext {
    #[must_use]
    pub fn new(endpoint: &Endpoint, body: &str, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.format(X_DATE_FORMAT).to_string(),
            date_stamp: now.format(DATE_STAMP_FORMAT).to_string(),
            region: endpoint.region.clone(),
            service: endpoint.service.clone(),
            host: endpoint.host.clone(),
            path: endpoint.path.clone(),
            method: METHOD.to_string(),
            body_hash: hash_payload(body.as_bytes()),
        }
    }

    /// Canonical request. Header order and casing are fixed.
    ///
    /// ```text
    /// POST
    /// /api/v1/chat/completions
    ///
    /// content-type:application/json
    /// host:<host>
    /// x-content-sha256:<body hash>
    /// x-date:<timestamp>
    ///
    /// content-type;host;x-content-sha256;x-date
    /// <body hash>
    /// ```
    #[must_use]
    pub fn canonical_request(&self) -> String {
        format!(
            "{method}\n{path}\n\n\
             content-type:{CONTENT_TYPE}\n\
             host:{host}\n\
             x-content-sha256:{hash}\n\
             x-date:{date}\n\n\
             {SIGNED_HEADERS}\n\
             {hash}",
            method = self.method,
            path = self.path,
            host = self.host,
            hash = self.body_hash,
            date = self.timestamp,
        )
    }

    #[must_use]
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/request",
            self.date_stamp, self.region, self.service
        )
    }

    #[must_use]
    pub fn string_to_sign(&self) -> String {
        build_string_to_sign(
            &self.timestamp,
            &self.credential_scope(),
            &hash_payload(self.canonical_request().as_bytes()),
        )
    }
}

/// Headers to attach to the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub x_date: String,
    pub x_content_sha256: String,
    pub authorization: String,
    pub host: String,
}

/// Base64 (standard, padded) SHA-256 of `payload`.
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(payload))
}

#[must_use]
pub fn build_string_to_sign(timestamp: &str, credential_scope: &str, canonical_hash: &str) -> String {
    [ALGORITHM, timestamp, credential_scope, canonical_hash].join("\n")
}

/// Date-scoped key: raw HMAC of the date stamp keyed by the secret key.
#[must_use]
pub fn derive_signing_key(secret_key: &str, date_stamp: &str) -> Vec<u8> {
    hmac_sha256(secret_key.as_bytes(), date_stamp.as_bytes())
}

/// Base64 HMAC of `string_to_sign` keyed by the derived key.
#[must_use]
pub fn compute_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    STANDARD.encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

#[must_use]
pub fn authorization_header(access_key: &str, credential_scope: &str, signature: &str) -> String {
    format!(
        "{ALGORITHM} Credential={access_key}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}"
    )
}

/// Signs `body` for `endpoint` at instant `now`.
#[must_use]
pub fn sign(
    body: &str,
    credentials: &Credentials,
    endpoint: &Endpoint,
    now: DateTime<Utc>,
) -> SignedHeaders {
    let ctx = SignatureContext::new(endpoint, body, now);
    let signing_key = derive_signing_key(&credentials.secret_key, &ctx.date_stamp);
    let signature = compute_signature(&signing_key, &ctx.string_to_sign());

    SignedHeaders {
        authorization: authorization_header(
            &credentials.access_key,
            &ctx.credential_scope(),
            &signature,
        ),
        x_date: ctx.timestamp,
        x_content_sha256: ctx.body_hash,
        host: ctx.host,
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
