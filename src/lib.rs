//! Doubao relay - a serverless function that forwards a question to the Volcengine
//! Doubao chat-completion API.
//!
//! Each invocation is independent:
//! 1. Validate the inbound `{ "question": ... }` body
//! 2. Build the chat-completion payload and sign it with the HMAC-SHA256 scheme
//! 3. Send it upstream once and relay the JSON reply (or a `{error, detail}` envelope)
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (`lambda_runtime`) for serverless execution
//! - reqwest for the outbound HTTPS call
//! - hmac/sha2/base64 for request signing
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use doubao_relay::clients::{ChatRelay, ReqwestTransport};
//! use doubao_relay::core::clock::SystemClock;
//! use doubao_relay::core::config::{AppConfig, Credentials, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     doubao_relay::setup_logging();
//!
//!     let config = AppConfig {
//!         credentials: Credentials::new("dummy_access_key", "dummy_secret_key"),
//!         endpoint: Endpoint::default(),
//!         model: "doubao-pro".to_string(),
//!         request_timeout: Duration::from_secs(30),
//!     };
//!     let transport = ReqwestTransport::new(config.request_timeout)?;
//!     let relay = ChatRelay::new(config, Arc::new(SystemClock), Arc::new(transport));
//!
//!     let reply = relay.ask("What is Rust?").await?;
//!     println!("{}", reply.get());
//!     Ok(())
//! }
//! ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. The level comes from `RUST_LOG`, defaulting to `info` (or `debug`
/// with the `debug-logs` feature). Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// doubao_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if cfg!(feature = "debug-logs") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
