//! Argument parsing and result shaping shared by the tools.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use immich_core::{ImmichError, ImmichResult};

use crate::types::{McpError, McpResult, ToolCallResult};

/// Arguments for tools that take none.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NoArgs {}

pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Turn an Immich outcome into a tool result.
///
/// Rejected arguments become a JSON-RPC error; every other failure is reported
/// to the caller as an `isError` result.
pub(crate) fn respond<T: Serialize>(action: &str, result: ImmichResult<T>) -> McpResult<ToolCallResult> {
    match result {
        Ok(value) => Ok(ToolCallResult::json(&value)),
        Err(e) => failure(action, e),
    }
}

pub(crate) fn failure(action: &str, err: ImmichError) -> McpResult<ToolCallResult> {
    if let ImmichError::InvalidArgument(_) = err {
        return Err(McpError::immich(format!("Failed to {action}"), err));
    }
    tracing::warn!(kind = err.kind(), "Failed to {action}: {err}");
    Ok(ToolCallResult::error(format!("Failed to {action}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_errors_become_error_results() {
        let result = respond::<()>(
            "get album",
            Err(ImmichError::Status {
                endpoint: "/albums/x".to_string(),
                status: 404,
                body: "Not found".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn rejected_arguments_become_invalid_params() {
        let err = respond::<()>(
            "get album",
            Err(ImmichError::InvalidArgument("Invalid album ID".to_string())),
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::types::error_codes::INVALID_PARAMS);
    }

    #[test]
    fn empty_object_parses_as_no_args() {
        assert!(parse_args::<NoArgs>(json!({})).is_ok());
    }
}
