//! Resource registration and dispatch.

use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::templates::*;
use super::{account, api_keys, library, permissions, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    pub async fn read(
        uri: &str,
        ctx: &AppContext,
        cancel: &CancellationToken,
    ) -> McpResult<ReadResourceResult> {
        match uri {
            USER_ME => return account::read_current_user(ctx).await,
            USERS_LIST => return account::read_users(ctx).await,
            PARTNERS_LIST => return account::read_partners(ctx).await,
            APIKEY_ME => return api_keys::read_current_key(ctx).await,
            APIKEYS_LIST => return api_keys::read_keys(ctx).await,
            PERMISSIONS_ME => return permissions::read_permissions(ctx, cancel).await,
            _ => {}
        }

        if let Some(id) = uri.strip_prefix(APIKEY_PREFIX) {
            api_keys::read_key(template_id(uri, id)?, ctx).await
        } else if let Some(id) = uri.strip_prefix(ASSET_PREFIX) {
            library::read_asset(template_id(uri, id)?, ctx).await
        } else if let Some(id) = uri.strip_prefix(ALBUM_PREFIX) {
            library::read_album(template_id(uri, id)?, ctx).await
        } else {
            Err(McpError::ResourceNotFound(uri.to_string()))
        }
    }
}

fn template_id<'a>(uri: &str, id: &'a str) -> McpResult<&'a str> {
    if id.is_empty() || id.contains('/') {
        return Err(McpError::InvalidParams(format!(
            "Malformed resource URI: {uri}"
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_must_be_single_segments() {
        assert_eq!(template_id("asset://abc", "abc").unwrap(), "abc");
        assert!(template_id("asset://", "").is_err());
        assert!(template_id("asset://a/b", "a/b").is_err());
    }

    #[test]
    fn static_resources_are_listed() {
        let uris: Vec<_> = ResourceRegistry::list_resources()
            .into_iter()
            .map(|r| r.uri)
            .collect();
        assert!(uris.contains(&PERMISSIONS_ME.to_string()));
        assert_eq!(ResourceRegistry::list_templates().len(), 3);
    }
}
