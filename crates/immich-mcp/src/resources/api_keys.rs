//! Resources: apikey://me, apikeys://list, apikey://{id}

use crate::context::AppContext;
use crate::types::{McpResult, ReadResourceResult};

use super::fetch_failed;
use super::templates::{APIKEYS_LIST, APIKEY_ME, APIKEY_PREFIX};

pub async fn read_current_key(ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let key = ctx
        .api()
        .describe_credential()
        .await
        .map_err(|e| fetch_failed("API key", e))?;
    Ok(ReadResourceResult::json(APIKEY_ME, &key))
}

pub async fn read_keys(ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let keys = ctx
        .api()
        .list_api_keys()
        .await
        .map_err(|e| fetch_failed("API keys", e))?;
    Ok(ReadResourceResult::json(APIKEYS_LIST, &keys))
}

pub async fn read_key(id: &str, ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let key = ctx
        .api()
        .get_api_key(id)
        .await
        .map_err(|e| fetch_failed("API key", e))?;
    Ok(ReadResourceResult::json(format!("{APIKEY_PREFIX}{id}"), &key))
}
