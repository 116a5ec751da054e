//! API Lambda handler.
//!
//! This module handles:
//! - CORS preflight (`OPTIONS`)
//! - Question validation
//! - Forwarding to the chat-completion relay and mapping its result to a response

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::{error, info, warn};

use super::{helpers, parsing};
use crate::clients::ChatRelay;
use crate::core::config::AppConfig;
use crate::errors::RelayError;

/// Handler state built once per process.
///
/// A configuration failure at start-up is kept and reported on every ask, so the
/// function keeps answering preflights and returns a 500 instead of crashing.
pub struct ApiHandler {
    relay: Result<ChatRelay, RelayError>,
}

impl ApiHandler {
    #[must_use]
    pub fn new(relay: ChatRelay) -> Self {
        Self { relay: Ok(relay) }
    }

    /// Builds the handler from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let relay = AppConfig::from_env().and_then(ChatRelay::from_config);
        if let Err(e) = &relay {
            error!("Config error: {}", e);
        }
        Self { relay }
    }

    /// Handler whose every ask fails with `error`.
    #[must_use]
    pub fn unconfigured(error: RelayError) -> Self {
        Self { relay: Err(error) }
    }

    /// Lambda handler for the API entrypoint.
    ///
    /// # Errors
    ///
    /// Never returns `Err`; every failure is turned into an error response.
    #[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<Value, Error> {
        let payload = event.payload;
        info!(
            method = parsing::request_method(&payload).unwrap_or("<none>"),
            "API Lambda received request"
        );

        if parsing::is_preflight(&payload) {
            return Ok(helpers::ok_empty());
        }

        Ok(match self.ask(&payload).await {
            Ok(reply) => helpers::ok_json(&reply),
            Err(RelayError::InvalidQuestion) => {
                warn!("Rejected request without a valid question");
                helpers::from_error(&RelayError::InvalidQuestion)
            }
            Err(e) => {
                error!("Function invocation failed: {}", e);
                helpers::from_error(&e)
            }
        })
    }

    async fn ask(&self, payload: &Value) -> Result<Box<RawValue>, RelayError> {
        let question = parsing::parse_question(payload)?;
        let relay = self.relay.as_ref().map_err(Clone::clone)?;
        relay.ask(&question).await
    }
}
