//! Typed records for the Immich REST payloads this crate consumes.
//!
//! Required fields are enforced at decode time so a response missing them
//! fails with a descriptive error instead of surfacing later as a lookup
//! failure. Fields the server sends that are not modelled are kept in
//! `extra` and written back out unchanged when a record is re-serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated user (`/users/me`) or an entry of `/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A partner sharing their library with the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_timeline: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An API key description. `permissions` is the server's own list of
/// granted capability tags; older servers omit it.
///
/// `/api-keys/me` may describe the key with nothing but its permissions,
/// so the identifying fields default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub original_file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecord {
    pub id: String,
    pub album_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_count: Option<u64>,
    /// Embedded assets are passed through as sent; one incomplete entry
    /// must not make the whole album unreadable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `/people`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeoplePage {
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<u64>,
    pub people: Vec<PersonRecord>,
}

/// `/server/about`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerAbout {
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/server/version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A page of assets inside a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPage {
    pub total: u64,
    pub count: u64,
    pub items: Vec<AssetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

/// Response body of `/search/metadata` and `/search/smart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub assets: AssetPage,
}

/// Per-id outcome of bulk album membership changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkIdResult {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of an asset upload: `created` or `duplicate`.
///
/// When the upload asked for an album, `album_id` names it and
/// `album_error` carries the reason the asset could not be linked. The asset
/// exists on the server either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub album_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_ids: Vec<String>,
}

/// Filters for `/search/metadata`. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Natural-language search for `/search/smart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub album_ids: Vec<String>,
}

/// A local file to upload, with the device identifiers Immich requires.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: std::path::PathBuf,
    pub device_id: String,
    pub album_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_field_names_it() {
        let err = serde_json::from_value::<UserRecord>(json!({
            "id": "u1",
            "email": "test@example.com"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "a1",
            "type": "IMAGE",
            "originalFileName": "beach.jpg",
            "exifInfo": { "city": "Lisbon" }
        });
        let asset: AssetRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(asset.asset_type, "IMAGE");
        assert_eq!(asset.extra["exifInfo"]["city"], "Lisbon");
        assert_eq!(serde_json::to_value(&asset).unwrap(), raw);
    }

    #[test]
    fn api_key_without_permissions_decodes() {
        let key: ApiKeyRecord = serde_json::from_value(json!({
            "id": "k1",
            "name": "My API Key",
            "createdAt": "2025-09-02T00:00:00Z"
        }))
        .unwrap();
        assert!(key.permissions.is_none());
        assert!(key.created_at.is_some());
    }

    #[test]
    fn api_key_with_only_permissions_decodes() {
        let key: ApiKeyRecord = serde_json::from_value(json!({
            "permissions": ["user.read", "server.about"]
        }))
        .unwrap();
        assert!(key.id.is_empty());
        assert_eq!(
            key.permissions,
            Some(vec!["user.read".to_string(), "server.about".to_string()])
        );
    }

    #[test]
    fn metadata_query_omits_unset_filters() {
        let query = MetadataQuery {
            asset_type: Some("VIDEO".to_string()),
            size: Some(1),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "type": "VIDEO", "size": 1 })
        );
    }

    #[test]
    fn server_version_displays_semver() {
        let v = ServerVersion {
            major: 1,
            minor: 132,
            patch: 3,
        };
        assert_eq!(v.to_string(), "1.132.3");
    }
}
