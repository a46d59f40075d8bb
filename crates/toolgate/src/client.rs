//! Tool invoker: the public client surface.
//!
//! A [`ToolClient`] pairs one [`Session`] with one [`HttpTransport`] for the
//! duration of a logical conversation. Every call ensures the handshake has
//! run, then issues the request with a fresh id and unwraps the result.

use std::time::Duration;

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::protocol::{CallToolParams, JsonRpcRequest, ListToolsResult, ToolInfo};
use crate::session::Session;
use crate::transport::{HttpTransport, HttpTransportConfig};

/// Configuration for a tool-server connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL of the tool server.
    pub url: String,
    /// Bearer token. Empty means unauthenticated.
    pub token: String,
    /// Request timeout override.
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Create a config for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: String::new(),
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// A synchronous client for one tool-server conversation.
///
/// Each logical conversation constructs its own client; session state is
/// owned here and shared with nothing. The handshake runs lazily on the
/// first call and at most once per session.
pub struct ToolClient {
    transport: HttpTransport,
    session: Session,
}

impl ToolClient {
    /// Create a client with a fresh session.
    ///
    /// Validates the URL and builds the HTTP client; no request is sent
    /// until the first call.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let mut transport_config = HttpTransportConfig::new(&config.url);
        if let Some(timeout) = config.timeout {
            transport_config = transport_config.with_timeout(timeout);
        }
        for (key, value) in &config.headers {
            transport_config = transport_config.with_header(key, value);
        }

        let transport = HttpTransport::connect(transport_config)?;
        Ok(Self {
            transport,
            session: Session::new(config.token),
        })
    }

    /// The session owned by this client.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    /// Perform the handshake now instead of lazily on the first call.
    pub fn initialize(&mut self) -> Result<()> {
        self.session.initialize(&self.transport)
    }

    /// Call a named tool and return the raw `result` value.
    ///
    /// Ensures the session is initialized first; a handshake failure
    /// propagates unchanged and the next call retries it. A JSON-RPC error
    /// in the reply surfaces as [`ClientError::ToolCall`] carrying the
    /// server's message verbatim. A reply without a `result` field is
    /// success with [`Value::Null`], not an error.
    pub fn call_tool(&mut self, name: &str, arguments: Option<Value>) -> Result<Value> {
        self.session.initialize(&self.transport)?;

        let params = CallToolParams::new(name, arguments);
        let request = JsonRpcRequest::new(
            self.session.next_id(),
            "tools/call",
            Some(serde_json::to_value(&params)?),
        );

        tracing::debug!(tool = %name, id = request.id, "calling tool");
        let response = self.transport.request(&mut self.session, &request)?;

        if let Some(error) = response.error {
            tracing::debug!(tool = %name, code = error.code, "tool call rejected");
            return Err(ClientError::tool_call(error.message_or("tool call failed")));
        }

        tracing::debug!(tool = %name, "tool call succeeded");
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// List the tools the server advertises.
    pub fn list_tools(&mut self) -> Result<Vec<ToolInfo>> {
        self.session.initialize(&self.transport)?;

        let request = JsonRpcRequest::new(self.session.next_id(), "tools/list", None);
        let response = self.transport.request(&mut self.session, &request)?;

        if let Some(error) = response.error {
            return Err(ClientError::tool_call(error.message_or("tool listing failed")));
        }

        let listing: ListToolsResult =
            serde_json::from_value(response.result.unwrap_or(Value::Null))?;

        tracing::debug!(tool_count = listing.tools.len(), "listed tools");
        Ok(listing.tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("https://tools.example.com/mcp")
            .with_token("token123")
            .with_timeout(Duration::from_secs(60))
            .with_header("X-Trace", "abc");

        assert_eq!(config.url, "https://tools.example.com/mcp");
        assert_eq!(config.token, "token123");
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_connect_starts_uninitialized() {
        let client = ToolClient::connect(ClientConfig::new("http://localhost:9999/mcp")).unwrap();
        assert!(!client.is_initialized());
        assert_eq!(client.session().session_id(), None);
    }

    #[test]
    fn test_connect_invalid_url() {
        let result = ToolClient::connect(ClientConfig::new("not a url"));
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
