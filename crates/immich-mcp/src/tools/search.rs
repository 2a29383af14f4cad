//! Search tools: smart (CLIP) search, metadata filters, random picks.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use immich_core::{validate_id, MetadataQuery, SmartQuery};

use crate::context::AppContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, respond};

const DEFAULT_SMART_LIMIT: u32 = 20;
const DEFAULT_METADATA_LIMIT: u32 = 100;
const DEFAULT_RANDOM_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 1000;

const ASSET_TYPES: &[&str] = &["IMAGE", "VIDEO", "AUDIO", "OTHER"];

#[derive(Debug, Deserialize)]
struct SmartParams {
    query: String,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    album_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataParams {
    #[serde(default)]
    original_file_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    asset_type: Option<String>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    taken_after: Option<DateTime<Utc>>,
    #[serde(default)]
    taken_before: Option<DateTime<Utc>>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RandomParams {
    #[serde(default)]
    limit: Option<u32>,
}

fn limit_schema(default: u32) -> Value {
    json!({ "type": "integer", "minimum": 1, "maximum": MAX_LIMIT, "default": default })
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "search_photos".to_string(),
            description: Some(
                "Search photos with a natural-language query, e.g. \"dog on the beach\"".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "limit": limit_schema(DEFAULT_SMART_LIMIT),
                    "album_id": { "type": "string", "description": "Restrict to one album" }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "search_metadata".to_string(),
            description: Some("Search assets by file name, type, favourite flag, or date".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "original_file_name": { "type": "string" },
                    "description": { "type": "string" },
                    "asset_type": { "type": "string", "enum": ASSET_TYPES },
                    "is_favorite": { "type": "boolean" },
                    "taken_after": { "type": "string", "format": "date-time" },
                    "taken_before": { "type": "string", "format": "date-time" },
                    "limit": limit_schema(DEFAULT_METADATA_LIMIT),
                    "page": { "type": "integer", "minimum": 1 }
                }
            }),
        },
        ToolDefinition {
            name: "search_random".to_string(),
            description: Some("Pick random assets from the library".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": { "limit": limit_schema(DEFAULT_RANDOM_LIMIT) }
            }),
        },
    ]
}

fn check_limit(limit: Option<u32>, default: u32) -> McpResult<u32> {
    match limit.unwrap_or(default) {
        n @ 1..=MAX_LIMIT => Ok(n),
        n => Err(McpError::InvalidParams(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {n}"
        ))),
    }
}

pub async fn search_photos(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: SmartParams = parse_args(args)?;
    let album_ids = match params.album_id {
        Some(id) => {
            if let Err(e) = validate_id("album", &id) {
                return failure("search photos", e);
            }
            vec![id.trim().to_string()]
        }
        None => Vec::new(),
    };
    let query = SmartQuery {
        query: params.query,
        size: Some(check_limit(params.limit, DEFAULT_SMART_LIMIT)?),
        album_ids,
    };
    respond(
        "search photos",
        ctx.api().search_smart(&query).await.map(|r| r.assets),
    )
}

pub async fn search_metadata(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: MetadataParams = parse_args(args)?;

    let asset_type = match params.asset_type {
        Some(t) => {
            let upper = t.to_ascii_uppercase();
            if !ASSET_TYPES.contains(&upper.as_str()) {
                return Err(McpError::InvalidParams(format!(
                    "asset_type must be one of {}",
                    ASSET_TYPES.join(", ")
                )));
            }
            Some(upper)
        }
        None => None,
    };
    if let (Some(after), Some(before)) = (params.taken_after, params.taken_before) {
        if after > before {
            return Err(McpError::InvalidParams(
                "taken_after must not be later than taken_before".to_string(),
            ));
        }
    }

    let query = MetadataQuery {
        original_file_name: params.original_file_name,
        description: params.description,
        asset_type,
        is_favorite: params.is_favorite,
        taken_after: params.taken_after,
        taken_before: params.taken_before,
        size: Some(check_limit(params.limit, DEFAULT_METADATA_LIMIT)?),
        page: params.page.map(|p| p.max(1)),
    };
    respond(
        "search metadata",
        ctx.api().search_metadata(&query).await.map(|r| r.assets),
    )
}

pub async fn search_random(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: RandomParams = parse_args(args)?;
    let size = check_limit(params.limit, DEFAULT_RANDOM_LIMIT)?;
    respond("get random assets", ctx.api().search_random(size).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_bounded() {
        assert_eq!(check_limit(None, 20).unwrap(), 20);
        assert_eq!(check_limit(Some(MAX_LIMIT), 20).unwrap(), MAX_LIMIT);
        assert!(check_limit(Some(0), 20).is_err());
        assert!(check_limit(Some(MAX_LIMIT + 1), 20).is_err());
    }

    #[test]
    fn metadata_params_accept_rfc3339_dates() {
        let params: MetadataParams = parse_args(json!({
            "taken_after": "2024-01-01T00:00:00Z",
            "asset_type": "image"
        }))
        .unwrap();
        assert!(params.taken_after.is_some());
        assert_eq!(params.asset_type.as_deref(), Some("image"));
    }
}
