//! HTTP transport: one POST per JSON-RPC message.
//!
//! The endpoint looks stateless but may issue a session id in a response
//! header, which the transport records into the [`Session`] (first response
//! wins). Replies are classified by content type: a plain JSON document is
//! parsed directly, an event stream is handed to the reconciler together
//! with the outgoing request id.

use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use crate::session::Session;
use crate::sse;

/// Header carrying the protocol version on every request.
pub const PROTOCOL_VERSION_HEADER: &str = "MCP-Protocol-Version";

/// Header carrying the session id, both directions.
pub const SESSION_ID_HEADER: &str = "Mcp-Session-Id";

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Endpoint URL of the tool server.
    pub url: String,
    /// Request timeout. One bound per round trip, no retries.
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: Duration::from_secs(30),
            headers: Vec::new(),
        }
    }
}

impl HttpTransportConfig {
    /// Create a new transport config with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Blocking HTTP transport for a single endpoint.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport, validating the endpoint URL.
    pub fn connect(config: HttpTransportConfig) -> Result<Self> {
        url::Url::parse(&config.url)
            .map_err(|e| ClientError::transport(format!("invalid URL: {e}")))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::transport(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(
            url = %config.url,
            timeout_secs = config.timeout.as_secs(),
            "created HTTP transport"
        );

        Ok(Self { client, config })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Send a request and return the response answering it.
    ///
    /// An event-stream reply goes through [`sse::reconcile`] with this
    /// request's id; anything else is parsed as one JSON document. The HTTP
    /// status line is not consulted; the envelope decides success.
    pub fn request(&self, session: &mut Session, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let payload = serde_json::to_string(request)?;
        tracing::trace!(url = %self.config.url, body = %payload, "sending JSON-RPC request");

        let response = self.post(session, payload)?;
        Self::capture_session_id(session, &response);

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .map_err(|e| ClientError::transport(format!("failed to read response body: {e}")))?;

        tracing::trace!(content_type = %content_type, body = %body, "received reply");

        let message = if content_type.starts_with("text/event-stream") {
            sse::reconcile(&body, request.id)?
        } else {
            serde_json::from_str(&body)?
        };

        Ok(serde_json::from_value(message)?)
    }

    /// Send a notification. The reply body is not inspected, but a session
    /// id header is still recorded.
    pub fn notify(&self, session: &mut Session, notification: &JsonRpcNotification) -> Result<()> {
        let payload = serde_json::to_string(notification)?;
        tracing::trace!(url = %self.config.url, body = %payload, "sending JSON-RPC notification");

        let response = self.post(session, payload)?;
        Self::capture_session_id(session, &response);
        Ok(())
    }

    fn post(&self, session: &Session, payload: String) -> Result<reqwest::blocking::Response> {
        let mut req = self
            .client
            .post(&self.config.url)
            .header("Accept", "application/json, text/event-stream")
            .header("Content-Type", "application/json")
            .header(PROTOCOL_VERSION_HEADER, PROTOCOL_VERSION);

        if !session.token().is_empty() {
            req = req.header("Authorization", format!("Bearer {}", session.token()));
        }
        if let Some(sid) = session.session_id() {
            req = req.header(SESSION_ID_HEADER, sid);
        }
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        req.body(payload)
            .send()
            .map_err(|e| ClientError::transport(format!("request failed: {e}")))
    }

    fn capture_session_id(session: &mut Session, response: &reqwest::blocking::Response) {
        // Header lookup is case-insensitive in reqwest's header map.
        if let Some(sid) = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            session.record_session_id(sid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTransportConfig::new("http://localhost:8080/mcp")
            .with_timeout(Duration::from_secs(60))
            .with_header("X-Api-Key", "secret123");

        assert_eq!(config.url, "http://localhost:8080/mcp");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(
            config.headers,
            vec![("X-Api-Key".to_string(), "secret123".to_string())]
        );
    }

    #[test]
    fn test_connect_valid_url() {
        let config = HttpTransportConfig::new("http://localhost:8080/mcp");
        assert!(HttpTransport::connect(config).is_ok());
    }

    #[test]
    fn test_connect_invalid_url() {
        let config = HttpTransportConfig::new("not a valid url");
        match HttpTransport::connect(config) {
            Err(ClientError::Transport(msg)) => assert!(msg.contains("invalid URL")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
