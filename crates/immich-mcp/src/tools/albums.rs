//! Album tools: listing, inspection, creation, deletion, membership.

use serde::Deserialize;
use serde_json::{json, Value};

use immich_core::CreateAlbumRequest;

use crate::context::AppContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, respond};

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AlbumParams {
    album_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    album_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    asset_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MembershipParams {
    album_id: String,
    asset_ids: Vec<String>,
}

fn album_id_schema() -> Value {
    json!({ "type": "string", "description": "Album UUID" })
}

fn asset_ids_schema() -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": "Asset UUIDs" })
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_all_albums".to_string(),
            description: Some("List the albums visible to the API key".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "integer", "minimum": 1, "description": "Maximum albums to return" }
                }
            }),
        },
        ToolDefinition {
            name: "get_album_info".to_string(),
            description: Some("Get an album with its assets".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": { "album_id": album_id_schema() },
                "required": ["album_id"]
            }),
        },
        ToolDefinition {
            name: "create_album".to_string(),
            description: Some("Create an album, optionally seeded with assets".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "album_name": { "type": "string" },
                    "description": { "type": "string", "default": "" },
                    "asset_ids": asset_ids_schema()
                },
                "required": ["album_name"]
            }),
        },
        ToolDefinition {
            name: "delete_album".to_string(),
            description: Some("Delete an album. Its assets are kept".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": { "album_id": album_id_schema() },
                "required": ["album_id"]
            }),
        },
        ToolDefinition {
            name: "add_assets_to_album".to_string(),
            description: Some("Add assets to an album".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "album_id": album_id_schema(),
                    "asset_ids": asset_ids_schema()
                },
                "required": ["album_id", "asset_ids"]
            }),
        },
        ToolDefinition {
            name: "remove_assets_from_album".to_string(),
            description: Some("Remove assets from an album".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "album_id": album_id_schema(),
                    "asset_ids": asset_ids_schema()
                },
                "required": ["album_id", "asset_ids"]
            }),
        },
    ]
}

pub async fn get_all_albums(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: ListParams = parse_args(args)?;
    let limit = match params.limit {
        Some(0) => return Err(McpError::InvalidParams("limit must be at least 1".to_string())),
        Some(n) => n,
        None => u32::MAX,
    };
    respond("get albums", ctx.api().list_albums(limit).await)
}

pub async fn get_album_info(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: AlbumParams = parse_args(args)?;
    respond("get album", ctx.api().get_album(&params.album_id).await)
}

pub async fn create_album(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: CreateParams = parse_args(args)?;
    let request = CreateAlbumRequest {
        album_name: params.album_name,
        description: params.description,
        asset_ids: params.asset_ids,
    };
    respond("create album", ctx.api().create_album(&request).await)
}

pub async fn delete_album(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: AlbumParams = parse_args(args)?;
    match ctx.api().delete_album(&params.album_id).await {
        Ok(()) => Ok(ToolCallResult::text(format!(
            "Album {} deleted",
            params.album_id.trim()
        ))),
        Err(e) => failure("delete album", e),
    }
}

pub async fn add_assets_to_album(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: MembershipParams = parse_args(args)?;
    require_assets(&params.asset_ids)?;
    respond(
        "add assets to album",
        ctx.api()
            .add_assets_to_album(&params.album_id, &params.asset_ids)
            .await,
    )
}

pub async fn remove_assets_from_album(
    args: Value,
    ctx: &AppContext,
) -> McpResult<ToolCallResult> {
    let params: MembershipParams = parse_args(args)?;
    require_assets(&params.asset_ids)?;
    respond(
        "remove assets from album",
        ctx.api()
            .remove_assets_from_album(&params.album_id, &params.asset_ids)
            .await,
    )
}

fn require_assets(ids: &[String]) -> McpResult<()> {
    if ids.is_empty() {
        return Err(McpError::InvalidParams(
            "asset_ids must contain at least one asset".to_string(),
        ));
    }
    Ok(())
}
