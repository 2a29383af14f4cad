//! The API handle abstraction consumed by the prober and the MCP server.

use async_trait::async_trait;

use crate::error::{ImmichError, ImmichResult};
use crate::types::*;

/// An authenticated handle on an Immich server.
///
/// [`crate::ImmichClient`] is the HTTP implementation; tests substitute
/// scripted fakes.
#[async_trait]
pub trait ImmichApi: Send + Sync {
    /// `GET /server/ping`. True only when the server answers `pong`.
    async fn ping(&self) -> ImmichResult<bool>;

    async fn server_version(&self) -> ImmichResult<ServerVersion>;

    async fn fetch_server_about(&self) -> ImmichResult<ServerAbout>;

    /// Describe the credential making the call (`GET /api-keys/me`).
    async fn describe_credential(&self) -> ImmichResult<ApiKeyRecord>;

    async fn list_api_keys(&self) -> ImmichResult<Vec<ApiKeyRecord>>;

    async fn get_api_key(&self, id: &str) -> ImmichResult<ApiKeyRecord>;

    async fn fetch_current_user(&self) -> ImmichResult<UserRecord>;

    async fn list_users(&self) -> ImmichResult<Vec<UserRecord>>;

    async fn list_partners(&self) -> ImmichResult<Vec<PartnerRecord>>;

    /// First `page_size` assets visible to the credential.
    async fn list_assets(&self, page_size: u32) -> ImmichResult<Vec<AssetRecord>>;

    async fn get_asset(&self, id: &str) -> ImmichResult<AssetRecord>;

    /// Raw thumbnail bytes and their content type.
    async fn get_asset_thumbnail(&self, id: &str) -> ImmichResult<(Vec<u8>, String)>;

    async fn upload_asset(&self, request: &UploadRequest) -> ImmichResult<UploadResult>;

    /// At most `page_size` albums.
    async fn list_albums(&self, page_size: u32) -> ImmichResult<Vec<AlbumRecord>>;

    async fn get_album(&self, id: &str) -> ImmichResult<AlbumRecord>;

    async fn create_album(&self, request: &CreateAlbumRequest) -> ImmichResult<AlbumRecord>;

    async fn delete_album(&self, id: &str) -> ImmichResult<()>;

    async fn add_assets_to_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>>;

    async fn remove_assets_from_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>>;

    async fn search_smart(&self, query: &SmartQuery) -> ImmichResult<SearchResponse>;

    async fn search_metadata(&self, query: &MetadataQuery) -> ImmichResult<SearchResponse>;

    async fn search_random(&self, size: u32) -> ImmichResult<Vec<AssetRecord>>;

    async fn list_people(&self, page: u32, size: u32) -> ImmichResult<PeoplePage>;

    async fn get_person(&self, id: &str) -> ImmichResult<PersonRecord>;

    async fn get_person_thumbnail(&self, id: &str) -> ImmichResult<(Vec<u8>, String)>;
}

/// Reject anything that is not a UUID before it reaches a URL path.
pub fn validate_id(kind: &str, id: &str) -> ImmichResult<()> {
    uuid::Uuid::parse_str(id.trim())
        .map(|_| ())
        .map_err(|_| ImmichError::InvalidArgument(format!("Invalid {kind} ID: '{id}' is not a UUID")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_ids() {
        assert!(validate_id("asset", "550e8400-e29b-41d4-a716-446655440000").is_ok());
    }

    #[test]
    fn rejects_path_like_ids() {
        let err = validate_id("album", "../server/about").unwrap_err();
        assert!(matches!(err, ImmichError::InvalidArgument(_)));
        assert!(err.to_string().contains("album"));
    }
}
