//! Message framing for newline-delimited JSON.

use crate::types::{JsonRpcMessage, McpError, McpResult, RequestId};

/// Parse a single line of text as a JSON-RPC message.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Decode one raw input line. Bytes that are not UTF-8 are a parse error.
pub fn decode_line(bytes: &[u8]) -> McpResult<JsonRpcMessage> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| McpError::ParseError(format!("Invalid UTF-8: {e}")))?;
    parse_message(text)
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message(value: &serde_json::Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value)?;
    json.push('\n');
    Ok(json)
}

/// Framed error response for a line that could not be parsed. The request id
/// is unknown, so it is reported as null.
pub fn frame_parse_error(err: &McpError) -> McpResult<String> {
    let value = serde_json::to_value(err.to_json_rpc_error(RequestId::Null))?;
    frame_message(&value)
}
