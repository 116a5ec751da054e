//! Doubao chat-completion client
//!
//! Builds the signed request for a question, sends it once, and relays the JSON reply.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::value::RawValue;
use tracing::{debug, info, warn};
use url::Url;

use super::signature::{self, CONTENT_TYPE};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AppConfig;
use crate::core::models::ChatCompletionPayload;
use crate::errors::RelayError;

/// A fully signed outbound request. `body` is exactly the bytes that were hashed.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: Url,
    pub body: String,
    pub headers: Vec<(&'static str, String)>,
}

impl SignedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a signed request to the upstream service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<UpstreamResponse, RelayError>;
}

/// Production transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`RelayError::HttpError`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SignedRequest) -> Result<UpstreamResponse, RelayError> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in &request.headers {
            let value = value
                .parse()
                .map_err(|e| RelayError::HttpError(format!("Invalid {name} header: {e}")))?;
            headers.insert(*name, value);
        }

        let response = self
            .client
            .post(request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Signs questions and forwards them to the chat-completion endpoint.
pub struct ChatRelay {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn Transport>,
}

impl ChatRelay {
    #[must_use]
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            clock,
            transport,
        }
    }

    /// Relay backed by the system clock and a `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, RelayError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(config, Arc::new(SystemClock), Arc::new(transport)))
    }

    /// Validates the question and builds the signed request for it.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidQuestion`] for an empty question, or a
    /// serialization/configuration error.
    pub fn prepare(&self, question: &str) -> Result<SignedRequest, RelayError> {
        if question.is_empty() {
            return Err(RelayError::InvalidQuestion);
        }

        let body = ChatCompletionPayload::for_question(&self.config.model, question).to_body()?;
        let now = self.clock.now();
        let signed = signature::sign(
            &body,
            &self.config.credentials,
            &self.config.endpoint,
            now,
        );
        debug!(x_date = %signed.x_date, "Signed upstream request");

        Ok(SignedRequest {
            url: self.config.endpoint.url()?,
            body,
            headers: vec![
                ("Content-Type", CONTENT_TYPE.to_string()),
                ("X-Date", signed.x_date),
                ("X-Content-Sha256", signed.x_content_sha256),
                ("Authorization", signed.authorization),
                ("Host", signed.host),
            ],
        })
    }

    /// Sends the question upstream and returns the reply JSON untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidQuestion`] without any network call for an empty
    /// question; otherwise transport, status or JSON errors from the single attempt.
    pub async fn ask(&self, question: &str) -> Result<Box<RawValue>, RelayError> {
        let request = self.prepare(question)?;

        let started = Instant::now();
        let response = self.transport.send(request).await?;
        info!(
            status = response.status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Upstream responded"
        );

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "Upstream returned non-success status");
            return Err(RelayError::upstream_status(response.status, &response.body));
        }

        serde_json::from_str::<Box<RawValue>>(&response.body)
            .map_err(|e| RelayError::ParseError(format!("upstream body is not JSON: {e}")))
    }
}
