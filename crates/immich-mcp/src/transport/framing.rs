//! Newline-delimited JSON framing.

use serde_json::Value;

use crate::types::{JsonRpcError, JsonRpcMessage, McpError, McpResult, RequestId};

/// Parse one line of input as a JSON-RPC message.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a value as one line, newline included.
pub fn frame_message(value: &Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

/// Error response for input that could not be attributed to a request.
pub fn unattributed_error(err: &McpError) -> McpResult<Value> {
    let response = JsonRpcError::new(RequestId::Null, err.code(), err.to_string());
    serde_json::to_value(response).map_err(McpError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_lines_are_parse_errors() {
        let err = parse_message("   ").unwrap_err();
        assert_eq!(err.code(), crate::types::error_codes::PARSE_ERROR);
    }

    #[test]
    fn framed_messages_are_single_lines() {
        let framed = frame_message(&json!({ "a": "multi\nline" })).unwrap();
        assert!(framed.ends_with('\n'));
        assert_eq!(framed.matches('\n').count(), 1);
    }

    #[test]
    fn unattributed_errors_have_null_id() {
        let value = unattributed_error(&McpError::ParseError("bad".to_string())).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32700);
    }
}
