//! People (face recognition) tools.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, respond};

const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PersonParams {
    person_id: String,
}

pub fn definitions() -> Vec<ToolDefinition> {
    let person_only = json!({
        "type": "object",
        "properties": {
            "person_id": { "type": "string", "description": "Person UUID" }
        },
        "required": ["person_id"]
    });

    vec![
        ToolDefinition {
            name: "get_all_people".to_string(),
            description: Some("List recognised people, one page at a time".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page": { "type": "integer", "minimum": 1, "default": 1 },
                    "limit": { "type": "integer", "minimum": 1, "default": DEFAULT_PAGE_SIZE }
                }
            }),
        },
        ToolDefinition {
            name: "get_person".to_string(),
            description: Some("Get details of one person".to_string()),
            input_schema: person_only.clone(),
        },
        ToolDefinition {
            name: "get_person_thumbnail".to_string(),
            description: Some("Get the face thumbnail of a person".to_string()),
            input_schema: person_only,
        },
    ]
}

pub async fn get_all_people(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: ListParams = parse_args(args)?;
    let page = params.page.unwrap_or(1).max(1);
    let size = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    respond("get people", ctx.api().list_people(page, size).await)
}

pub async fn get_person(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: PersonParams = parse_args(args)?;
    respond("get person", ctx.api().get_person(&params.person_id).await)
}

pub async fn get_person_thumbnail(args: Value, ctx: &AppContext) -> McpResult<ToolCallResult> {
    let params: PersonParams = parse_args(args)?;
    match ctx.api().get_person_thumbnail(&params.person_id).await {
        Ok((bytes, mime)) => Ok(ToolCallResult::image(&bytes, mime)),
        Err(e) => failure("get person thumbnail", e),
    }
}
