//! Asset tools: metadata, thumbnails, uploads.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Value};

use immich_core::UploadRequest;

use crate::context::AppContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, respond};

#[derive(Debug, Deserialize)]
struct AssetParams {
    asset_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadParams {
    file_path: PathBuf,
    #[serde(default)]
    album_id: Option<String>,
}

pub fn definitions() -> Vec<ToolDefinition> {
    let asset_only = json!({
        "type": "object",
        "properties": {
            "asset_id": { "type": "string", "description": "Asset UUID" }
        },
        "required": ["asset_id"]
    });

    vec![
        ToolDefinition {
            name: "get_asset_info".to_string(),
            description: Some("Get metadata for a single asset".to_string()),
            input_schema: asset_only.clone(),
        },
        ToolDefinition {
            name: "get_asset_thumbnail".to_string(),
            description: Some("Get the thumbnail image of an asset".to_string()),
            input_schema: asset_only,
        },
        ToolDefinition {
            name: "upload_photo".to_string(),
            description: Some(
                "Upload a local file to Immich, optionally adding it to an album".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string", "description": "Path of the file on this machine" },
                    "album_id": { "type": "string", "description": "Album UUID to add the upload to" }
                },
                "required": ["file_path"]
            }),
        },
    ]
}

pub async fn get_asset_info(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: AssetParams = parse_args(args)?;
    respond("get asset", ctx.api().get_asset(&params.asset_id).await)
}

pub async fn get_asset_thumbnail(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: AssetParams = parse_args(args)?;
    match ctx.api().get_asset_thumbnail(&params.asset_id).await {
        Ok((bytes, mime)) => Ok(ToolCallResult::image(&bytes, mime)),
        Err(e) => failure("get asset thumbnail", e),
    }
}

pub async fn upload_photo(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: UploadParams = parse_args(args)?;
    if !params.file_path.is_file() {
        return Err(McpError::InvalidParams(format!(
            "File not found: {}",
            params.file_path.display()
        )));
    }

    let request = UploadRequest {
        path: params.file_path,
        device_id: ctx.device_id().to_string(),
        album_id: params.album_id,
    };
    tracing::info!(path = %request.path.display(), "Uploading asset");
    respond("upload photo", ctx.api().upload_asset(&request).await)
}
