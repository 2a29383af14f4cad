//! Tools about the server and the credential: ping, version, permissions.

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{parse_args, respond, NoArgs};

pub const PONG: &str = "pong";
pub const PING_FAILED: &str = "error: could not connect to Immich server";

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "ping".to_string(),
            description: Some(
                "Check the connection to the Immich server. Returns 'pong' when reachable"
                    .to_string(),
            ),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "get_server_version".to_string(),
            description: Some("Get the version of the Immich server".to_string()),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "probe_permissions".to_string(),
            description: Some(
                "Determine which permissions the configured API key has. Uses the key's \
                 own permission list when Immich reports one, otherwise probes read endpoints"
                    .to_string(),
            ),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}

pub async fn ping(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let _: NoArgs = parse_args(args)?;
    match ctx.api().ping().await {
        Ok(true) => Ok(ToolCallResult::text(PONG)),
        Ok(false) => Ok(ToolCallResult::text(PING_FAILED)),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "Ping failed: {e}");
            Ok(ToolCallResult::text(PING_FAILED))
        }
    }
}

pub async fn get_server_version(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let _: NoArgs = parse_args(args)?;
    let version = ctx.api().server_version().await.map(|v| {
        json!({
            "version": v.to_string(),
            "major": v.major,
            "minor": v.minor,
            "patch": v.patch,
        })
    });
    respond("get server version", version)
}

pub async fn probe_permissions(
    args: Value,
    ctx: &AppContext,
    cancel: &CancellationToken,
) -> McpResult<ToolCallResult> {
    let _: NoArgs = parse_args(args)?;
    let report = ctx.prober().probe_report(ctx.api(), cancel).await?;
    Ok(ToolCallResult::json(&json!({
        "source": report.source,
        "permissions": report.capabilities,
    })))
}
