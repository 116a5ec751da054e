//! Outbound clients

pub mod llm_client;
pub mod signature;

pub use llm_client::{ChatRelay, ReqwestTransport, SignedRequest, Transport, UpstreamResponse};
