//! Static resource and template listings.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition, JSON_MIME};

pub const USER_ME: &str = "user://me";
pub const USERS_LIST: &str = "users://list";
pub const PARTNERS_LIST: &str = "partners://list";
pub const APIKEY_ME: &str = "apikey://me";
pub const APIKEYS_LIST: &str = "apikeys://list";
pub const PERMISSIONS_ME: &str = "permissions://me";

pub const APIKEY_PREFIX: &str = "apikey://";
pub const ASSET_PREFIX: &str = "asset://";
pub const ALBUM_PREFIX: &str = "album://";

fn resource(uri: &str, name: &str, description: &str) -> ResourceDefinition {
    ResourceDefinition {
        uri: uri.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        mime_type: Some(JSON_MIME.to_string()),
    }
}

fn template(uri_template: &str, name: &str, description: &str) -> ResourceTemplateDefinition {
    ResourceTemplateDefinition {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        mime_type: Some(JSON_MIME.to_string()),
    }
}

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![
        template("apikey://{id}", "API key", "A single API key by ID"),
        template("asset://{id}", "Asset", "Metadata of a single asset"),
        template("album://{id}", "Album", "An album and its assets"),
    ]
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![
        resource(USER_ME, "Current user", "The user that owns the API key"),
        resource(USERS_LIST, "Users", "All users on the server"),
        resource(PARTNERS_LIST, "Partners", "Partners the current user shares with"),
        resource(APIKEY_ME, "Current API key", "The API key in use"),
        resource(APIKEYS_LIST, "API keys", "API keys of the current user"),
        resource(
            PERMISSIONS_ME,
            "Permissions",
            "Capabilities of the API key, reported or probed",
        ),
    ]
}
