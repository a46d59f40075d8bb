//! Error types for client operations.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error type for client operations.
///
/// Nothing is caught or retried inside the client; every variant is raised
/// synchronously to the caller of the failing operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (connect error, timeout). Never retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// The `initialize` handshake was rejected or produced no usable
    /// response. The session stays uninitialized, so the next call
    /// re-attempts the whole handshake.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// A response stream yielded no parseable JSON-RPC message.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered a tool call with a JSON-RPC error object.
    /// Carries the server's `message` field verbatim.
    #[error("tool call failed: {0}")]
    ToolCall(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a handshake error.
    pub fn handshake(msg: impl Into<String>) -> Self {
        Self::Handshake(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a tool-call error.
    pub fn tool_call(msg: impl Into<String>) -> Self {
        Self::ToolCall(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::transport("connection refused");
        assert!(err.to_string().contains("transport"));
        assert!(err.to_string().contains("connection refused"));

        let err = ClientError::tool_call("rate limited");
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_kinds_are_distinguishable() {
        let errors = [
            ClientError::transport("a"),
            ClientError::handshake("b"),
            ClientError::protocol("c"),
            ClientError::tool_call("d"),
        ];
        assert!(matches!(errors[0], ClientError::Transport(_)));
        assert!(matches!(errors[1], ClientError::Handshake(_)));
        assert!(matches!(errors[2], ClientError::Protocol(_)));
        assert!(matches!(errors[3], ClientError::ToolCall(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Json(_)));
    }
}
