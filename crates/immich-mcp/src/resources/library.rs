//! Resources: asset://{id} and album://{id}

use crate::context::AppContext;
use crate::types::{McpResult, ReadResourceResult};

use super::fetch_failed;
use super::templates::{ALBUM_PREFIX, ASSET_PREFIX};

pub async fn read_asset(id: &str, ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let asset = ctx
        .api()
        .get_asset(id)
        .await
        .map_err(|e| fetch_failed("asset", e))?;
    Ok(ReadResourceResult::json(format!("{ASSET_PREFIX}{id}"), &asset))
}

pub async fn read_album(id: &str, ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let album = ctx
        .api()
        .get_album(id)
        .await
        .map_err(|e| fetch_failed("album", e))?;
    Ok(ReadResourceResult::json(format!("{ALBUM_PREFIX}{id}"), &album))
}
