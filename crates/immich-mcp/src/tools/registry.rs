//! Tool registration and dispatch.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{albums, assets, people, search, server};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        let mut tools = server::definitions();
        tools.extend(albums::definitions());
        tools.extend(assets::definitions());
        tools.extend(search::definitions());
        tools.extend(people::definitions());
        tools
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        ctx: &AppContext,
        cancel: &CancellationToken,
    ) -> McpResult<ToolCallResult> {
        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        match name {
            "ping" => server::ping(args, ctx).await,
            "get_server_version" => server::get_server_version(args, ctx).await,
            "probe_permissions" => server::probe_permissions(args, ctx, cancel).await,

            "get_all_albums" => albums::get_all_albums(args, ctx).await,
            "get_album_info" => albums::get_album_info(args, ctx).await,
            "create_album" => albums::create_album(args, ctx).await,
            "delete_album" => albums::delete_album(args, ctx).await,
            "add_assets_to_album" => albums::add_assets_to_album(args, ctx).await,
            "remove_assets_from_album" => albums::remove_assets_from_album(args, ctx).await,

            "get_asset_info" => assets::get_asset_info(args, ctx).await,
            "get_asset_thumbnail" => assets::get_asset_thumbnail(args, ctx).await,
            "upload_photo" => assets::upload_photo(args, ctx).await,

            "search_photos" => search::search_photos(args, ctx).await,
            "search_metadata" => search::search_metadata(args, ctx).await,
            "search_random" => search::search_random(args, ctx).await,

            "get_all_people" => people::get_all_people(args, ctx).await,
            "get_person" => people::get_person(args, ctx).await,
            "get_person_thumbnail" => people::get_person_thumbnail(args, ctx).await,

            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tool_names_are_unique() {
        let tools = ToolRegistry::list_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
        assert!(names.contains("probe_permissions"));
        assert!(names.contains("upload_photo"));
    }

    #[test]
    fn schemas_are_objects() {
        for tool in ToolRegistry::list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }
}
