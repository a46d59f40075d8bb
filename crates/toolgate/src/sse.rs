//! SSE stream reconciliation.
//!
//! A streamable-HTTP server may answer a POST with `text/event-stream`,
//! multiplexing several JSON-RPC messages into one body: unrelated
//! notifications, out-of-order responses, and eventually the response for
//! the outstanding request. Reconciliation decodes the frames and picks the
//! one the caller is waiting for.

use serde_json::Value;

use crate::error::{ClientError, Result};

/// Decode a raw SSE body into event payload strings.
///
/// An event is one or more `data:` lines terminated by a blank line (or end
/// of input); its payload is the stripped line contents joined by newlines.
/// Comment lines (starting with `:`) and unknown fields are ignored, CR
/// line endings are tolerated.
pub fn decode_events(raw: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in raw.split('\n') {
        let line = line.trim_end_matches('\r');

        if line.is_empty() {
            if !data_lines.is_empty() {
                events.push(data_lines.join("\n"));
                data_lines.clear();
            }
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.trim());
        }
    }

    if !data_lines.is_empty() {
        events.push(data_lines.join("\n"));
    }

    events
}

/// Extract the JSON-RPC message answering `request_id` from a raw SSE body.
///
/// Each event is parsed independently; frames that fail to parse are
/// skipped rather than aborting the scan. A frame whose `id` equals
/// `request_id` wins immediately. When no frame carries the requested id,
/// the most recently parsed frame is returned instead; some servers omit
/// the id on the final frame, so this fallback is kept even though it is a
/// weak guarantee. A stream with no parseable frame at all is fatal.
pub fn reconcile(raw: &str, request_id: u64) -> Result<Value> {
    let mut last: Option<Value> = None;

    for event in decode_events(raw) {
        let Ok(parsed) = serde_json::from_str::<Value>(&event) else {
            tracing::trace!(frame = %event, "skipping unparseable SSE frame");
            continue;
        };
        if parsed.get("id").and_then(Value::as_u64) == Some(request_id) {
            return Ok(parsed);
        }
        last = Some(parsed);
    }

    last.ok_or_else(|| ClientError::protocol("no valid JSON-RPC response found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_single_event() {
        let events = decode_events("event: message\ndata: {\"jsonrpc\":\"2.0\"}\n\n");
        assert_eq!(events, vec!["{\"jsonrpc\":\"2.0\"}"]);
    }

    #[test]
    fn test_joins_multiline_data() {
        let events = decode_events("data: a\ndata: b\n\ndata: c\n");
        assert_eq!(events, vec!["a\nb", "c"]);
    }

    #[test]
    fn test_ignores_comments_and_crlf() {
        let events = decode_events(": keep-alive\r\ndata: {\"id\":1}\r\n\r\n");
        assert_eq!(events, vec!["{\"id\":1}"]);
    }

    #[test]
    fn test_reconcile_matches_by_id() {
        let body = concat!(
            "data: {\"jsonrpc\":\"2.0\",\"id\":5,\"result\":\"other\"}\n\n",
            "data: not json\n\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":\"mine\"}\n\n",
        );
        let msg = reconcile(body, 7).unwrap();
        assert_eq!(msg["id"], 7);
        assert_eq!(msg["result"], "mine");
    }

    #[test]
    fn test_reconcile_match_wins_over_later_frames() {
        let body = concat!(
            "data: {\"jsonrpc\":\"2.0\",\"id\":3,\"result\":\"mine\"}\n\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":4,\"result\":\"later\"}\n\n",
        );
        let msg = reconcile(body, 3).unwrap();
        assert_eq!(msg["result"], "mine");
    }

    #[test]
    fn test_reconcile_falls_back_to_last_parsed() {
        let body = concat!(
            "data: {\"jsonrpc\":\"2.0\",\"id\":5,\"result\":\"a\"}\n\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":6,\"result\":\"b\"}\n\n",
        );
        let msg = reconcile(body, 9).unwrap();
        assert_eq!(msg["id"], 6);
        assert_eq!(msg["result"], "b");
    }

    #[test]
    fn test_reconcile_skips_junk_in_fallback() {
        let body = concat!(
            "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\"}\n\n",
            "data: garbage\n\n",
        );
        let msg = reconcile(body, 2).unwrap();
        assert_eq!(msg, json!({"jsonrpc": "2.0", "method": "notifications/progress"}));
    }

    #[test]
    fn test_reconcile_empty_stream_is_fatal() {
        let err = reconcile("data: nonsense\n\n: comment only\n\n", 1).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert!(err.to_string().contains("no valid JSON-RPC response"));
    }
}
