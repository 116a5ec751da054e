use serde::{Deserialize, Serialize};

use super::config::{MAX_TOKENS, TEMPERATURE};
use crate::errors::RelayError;

/// Inbound body accepted by the API.
#[derive(Debug, Deserialize)]
pub struct InboundRequest {
    #[serde(default)]
    pub question: Option<String>,
}

impl InboundRequest {
    /// Returns the question if it is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidQuestion`] otherwise.
    pub fn into_question(self) -> Result<String, RelayError> {
        match self.question {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(RelayError::InvalidQuestion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat-completion request body. Field order here is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatCompletionPayload {
    #[must_use]
    pub fn for_question(model: &str, question: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: question.to_string(),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Compact JSON; the returned string is both hashed and sent.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::SerializeError`] if serialization fails.
    pub fn to_body(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|e| RelayError::SerializeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_layout_is_stable() {
        let body = ChatCompletionPayload::for_question("doubao-pro", "hello")
            .to_body()
            .unwrap();
        assert_eq!(
            body,
            r#"{"model":"doubao-pro","messages":[{"role":"user","content":"hello"}],"temperature":0.7,"max_tokens":2000}"#
        );
    }

    #[test]
    fn test_question_is_carried_unchanged() {
        for question in ["  padded  ", "line\nbreak", "quote \" and \\", "你好", "🦀"] {
            let body = ChatCompletionPayload::for_question("m", question)
                .to_body()
                .unwrap();
            let parsed: ChatCompletionPayload = serde_json::from_str(&body).unwrap();
            assert_eq!(parsed.messages.len(), 1);
            assert_eq!(parsed.messages[0].role, "user");
            assert_eq!(parsed.messages[0].content, question);
        }
    }

    #[test]
    fn test_into_question_rejects_missing_and_empty() {
        let missing: InboundRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            missing.into_question(),
            Err(RelayError::InvalidQuestion)
        ));

        let empty: InboundRequest = serde_json::from_str(r#"{"question":""}"#).unwrap();
        assert!(matches!(empty.into_question(), Err(RelayError::InvalidQuestion)));

        let null: InboundRequest = serde_json::from_str(r#"{"question":null}"#).unwrap();
        assert!(matches!(null.into_question(), Err(RelayError::InvalidQuestion)));
    }

    #[test]
    fn test_into_question_keeps_whitespace() {
        let req: InboundRequest = serde_json::from_str(r#"{"question":" "}"#).unwrap();
        assert_eq!(req.into_question().unwrap(), " ");
    }
}
