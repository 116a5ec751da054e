#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use doubao_relay::RelayError;
use doubao_relay::clients::{ChatRelay, SignedRequest, Transport, UpstreamResponse};
use doubao_relay::core::clock::FixedClock;
use doubao_relay::core::config::{AppConfig, Credentials, Endpoint};

pub const GOLDEN_AUTHORIZATION: &str = "HMAC-SHA256 Credential=test-access-key/20240101/cn-north-1/doubao/request, SignedHeaders=content-type;host;x-content-sha256;x-date, Signature=zDcWqapq1Hh6eFApsZPPxV2iJn86OPzC1Bo0ImqGuwg=";

/// What the mock answers with.
pub enum Reply {
    Ok(u16, &'static str),
    NetworkError(&'static str),
}

/// Transport that records requests instead of sending them.
pub struct MockTransport {
    reply: Reply,
    calls: AtomicUsize,
    last: Mutex<Option<SignedRequest>>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SignedRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: SignedRequest) -> Result<UpstreamResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);
        match self.reply {
            Reply::Ok(status, body) => Ok(UpstreamResponse {
                status,
                body: body.to_string(),
            }),
            Reply::NetworkError(msg) => Err(RelayError::HttpError(msg.to_string())),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        credentials: Credentials::new("test-access-key", "test-secret-key"),
        endpoint: Endpoint::default(),
        model: "doubao-pro".to_string(),
        request_timeout: Duration::from_secs(30),
    }
}

pub fn new_year_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ))
}

pub fn relay_with(transport: Arc<MockTransport>) -> ChatRelay {
    ChatRelay::new(test_config(), new_year_clock(), transport)
}
