//! Resource: permissions://me

use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::types::{McpResult, ReadResourceResult};

use super::templates::PERMISSIONS_ME;

/// Probe the credential and report its capabilities.
///
/// Never fails on Immich errors: a key that can read nothing yields an empty
/// list. Only cancellation ends the read early.
pub async fn read_permissions(
    ctx: &AppContext,
    cancel: &CancellationToken,
) -> McpResult<ReadResourceResult> {
    let report = ctx.prober().probe_report(ctx.api(), cancel).await?;
    Ok(ReadResourceResult::json(
        PERMISSIONS_ME,
        &json!({
            "source": report.source,
            "permissions": report.capabilities,
        }),
    ))
}
