//! Synchronous MCP (Model Context Protocol) client over streamable HTTP.
//!
//! This crate lets a caller invoke named tools on a remote MCP endpoint
//! that speaks JSON-RPC 2.0 over HTTP POST and may answer either with a
//! single JSON document or with an SSE stream multiplexing several
//! messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolClient                                                 │
//! │  - ensure initialized, then tools/call / tools/list         │
//! │  - unwraps result, maps JSON-RPC errors to ClientError      │
//! └─────────────────────────────────────────────────────────────┘
//!            │ owns                          │ owns
//!            ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │  Session                 │   │  HttpTransport               │
//! │  - token / session id    │   │  - one POST per message      │
//! │  - request-id counter    │◄──│  - header assembly           │
//! │  - initialize handshake  │   │  - content-type dispatch     │
//! └──────────────────────────┘   └──────────────┬───────────────┘
//!                                               │ event streams
//!                                               ▼
//!                                ┌──────────────────────────────┐
//!                                │  sse::reconcile              │
//!                                │  - id match, last-seen       │
//!                                │    fallback                  │
//!                                └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use toolgate::{ClientConfig, ToolClient};
//!
//! let config = ClientConfig::new("https://tools.example.com/mcp")
//!     .with_token(token);
//!
//! // One client per logical conversation; the handshake runs lazily.
//! let mut client = ToolClient::connect(config)?;
//! let result = client.call_tool("available-coupons", None)?;
//!
//! // Optional typed view over the MCP content shape.
//! let contents = toolgate::CallToolResult::from_value(result)?;
//! println!("{}", contents.text().unwrap_or_default());
//! ```
//!
//! # Protocol flow
//!
//! 1. Client sends `initialize` with a fixed protocol version, empty
//!    capabilities, and its identity.
//! 2. Server responds; a `Mcp-Session-Id` response header, if present, is
//!    recorded first-wins and echoed on every later request.
//! 3. Client sends `notifications/initialized` (fire-and-forget).
//! 4. Tool calls are now legal. Request ids are unique and strictly
//!    increasing for the lifetime of the session.
//!
//! There is no caching, no automatic retry, and no concurrent outstanding
//! request per session; callers own their retry policy.

pub mod client;
pub mod error;
pub mod protocol;
pub mod session;
pub mod sse;
pub mod transport;

// Re-export main types
pub use client::{ClientConfig, ToolClient};
pub use error::{ClientError, Result};
pub use protocol::{
    CallToolParams, CallToolResult, ClientCapabilities, ClientIdentity, InitializeParams,
    InitializeResult, JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerIdentity, ToolContent, ToolInfo, JSONRPC_VERSION, PROTOCOL_VERSION,
};
pub use session::Session;
pub use transport::{HttpTransport, HttpTransportConfig, PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER};
