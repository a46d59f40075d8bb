//! Session state and the initialize handshake.
//!
//! A [`Session`] is an explicitly owned value: one per logical conversation,
//! passed by reference into the transport and the invoker. Nothing about it
//! is global, so independent conversations run with independently-owned
//! sessions. It is deliberately not synchronized: the counter and the
//! initialize-then-call sequence assume a single caller.

use crate::error::{ClientError, Result};
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcNotification, JsonRpcRequest, ServerIdentity,
};
use crate::transport::HttpTransport;

/// Per-conversation client state: bearer token, negotiated session id,
/// initialization flag, and the request-id counter.
#[derive(Debug)]
pub struct Session {
    /// Bearer credential. Empty means unauthenticated.
    token: String,
    /// Session id issued by the server, set at most once.
    session_id: Option<String>,
    /// Whether the handshake has completed. Never reverts to false.
    initialized: bool,
    /// Next request id to hand out; starts at 1, never reused or reset.
    next_request_id: u64,
    /// Server identity decoded best-effort from the initialize result.
    server: Option<ServerIdentity>,
}

impl Session {
    /// Create a fresh, uninitialized session.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            session_id: None,
            initialized: false,
            next_request_id: 1,
            server: None,
        }
    }

    /// The bearer token, possibly empty.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The session id issued by the server, if one has been observed.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether the handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Server identity learned during the handshake, if the server sent one.
    pub fn server(&self) -> Option<&ServerIdentity> {
        self.server.as_ref()
    }

    /// Return the current request id and advance the counter.
    ///
    /// N calls yield `1, 2, …, N`; ids are never reused, including across a
    /// failed handshake.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Record the session id from a response header, first-wins.
    ///
    /// Later responses carrying a different value are ignored for the
    /// lifetime of this session.
    pub(crate) fn record_session_id(&mut self, id: &str) {
        if self.session_id.is_none() {
            tracing::debug!(session_id = %id, "server assigned session id");
            self.session_id = Some(id.to_string());
        }
    }

    /// Perform the one-time `initialize` handshake.
    ///
    /// Idempotent: returns immediately once initialized. On a JSON-RPC error
    /// (or an unusable response body) the handshake fails with
    /// [`ClientError::Handshake`] and the session stays uninitialized, so a
    /// later call re-attempts it from scratch. Transport failures propagate
    /// as [`ClientError::Transport`] with the same effect.
    pub fn initialize(&mut self, transport: &HttpTransport) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let params = InitializeParams::default();
        let request = JsonRpcRequest::new(
            self.next_id(),
            "initialize",
            Some(serde_json::to_value(&params)?),
        );

        let response = match transport.request(self, &request) {
            Ok(response) => response,
            Err(ClientError::Json(e)) => {
                return Err(ClientError::handshake(format!(
                    "no usable initialize response: {e}"
                )));
            }
            Err(e) => return Err(e),
        };

        if let Some(error) = response.error {
            return Err(ClientError::handshake(
                error.message_or("initialize rejected"),
            ));
        }

        self.server = response
            .result
            .and_then(|v| serde_json::from_value::<InitializeResult>(v).ok())
            .and_then(|r| r.server_info);

        // Complete the lifecycle handshake before accepting tool calls.
        let note = JsonRpcNotification::new("notifications/initialized", None);
        transport.notify(self, &note)?;
        self.initialized = true;

        match &self.server {
            Some(server) => tracing::info!(
                server = %server.name,
                version = %server.version,
                "session initialized"
            ),
            None => tracing::info!("session initialized"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_strictly_increasing() {
        let mut session = Session::new("");
        let ids: Vec<u64> = (0..5).map(|_| session.next_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_session_id_is_first_wins() {
        let mut session = Session::new("tok");
        assert_eq!(session.session_id(), None);

        session.record_session_id("alpha");
        assert_eq!(session.session_id(), Some("alpha"));

        session.record_session_id("beta");
        assert_eq!(session.session_id(), Some("alpha"));
    }

    #[test]
    fn test_new_session_is_uninitialized() {
        let session = Session::new("tok");
        assert!(!session.is_initialized());
        assert_eq!(session.token(), "tok");
        assert!(session.server().is_none());
    }
}
