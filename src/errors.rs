use thiserror::Error;

/// Longest slice of an upstream error body carried into an error message.
const MAX_UPSTREAM_DETAIL: usize = 512;

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("invalid question")]
    InvalidQuestion,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Failed to parse upstream response: {0}")]
    ParseError(String),

    #[error("Failed to serialize request payload: {0}")]
    SerializeError(String),
}

impl RelayError {
    /// HTTP status the API layer answers with for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::InvalidQuestion => 400,
            _ => 500,
        }
    }

    /// Builds an [`RelayError::UpstreamStatus`], truncating long bodies.
    #[must_use]
    pub fn upstream_status(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > MAX_UPSTREAM_DETAIL {
            let mut cut: String = body.chars().take(MAX_UPSTREAM_DETAIL).collect();
            cut.push('…');
            cut
        } else {
            body.to_string()
        };
        RelayError::UpstreamStatus { status, body }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::ParseError(error.to_string())
    }
}
