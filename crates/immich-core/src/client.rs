//! reqwest-backed implementation of [`ImmichApi`].
//!
//! Network errors and 5xx responses are retried with exponential backoff,
//! 429 honours `retry-after`. Every other non-2xx status is final.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{validate_id, ImmichApi};
use crate::config::ImmichConfig;
use crate::error::{ImmichError, ImmichResult};
use crate::types::*;

const MAX_BACKOFF: Duration = Duration::from_secs(8);
const MAX_RETRY_AFTER_SECS: u64 = 10;
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for one Immich server and one API key.
#[derive(Clone)]
pub struct ImmichClient {
    http: reqwest::Client,
    api_base: String,
    max_retries: u32,
}

impl ImmichClient {
    pub fn new(config: &ImmichConfig) -> ImmichResult<Self> {
        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            ImmichError::Config("API key contains characters not allowed in a header".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .user_agent(concat!("immich-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImmichError::Config(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(api_base = %config.api_base(), "Immich client created");

        Ok(Self {
            http,
            api_base: config.api_base(),
            max_retries: config.max_retries(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Ping the server, folding every failure into `false`.
    pub async fn test_connection(&self) -> bool {
        match self.ping().await {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Immich answered /server/ping without 'pong'");
                false
            }
            Err(e) => {
                tracing::warn!("Connection test failed: {e}");
                false
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Send a request, rebuilding it for each retry.
    async fn send<F>(&self, endpoint: &str, build: F) -> ImmichResult<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut retries = 0u32;

        loop {
            match build(&self.http).send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_server_error() && retries < self.max_retries {
                        retries += 1;
                        let delay = backoff(retries);
                        tracing::debug!(endpoint, %status, ?delay, "Retrying after server error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && retries < self.max_retries {
                        retries += 1;
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        let delay = Duration::from_secs(retry_after.min(MAX_RETRY_AFTER_SECS));
                        tracing::debug!(endpoint, ?delay, "Rate limited, backing off");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return check_status(endpoint, resp).await;
                }
                Err(e) => {
                    if retries < self.max_retries {
                        retries += 1;
                        let delay = backoff(retries);
                        tracing::debug!(endpoint, ?delay, "Retrying after transport error: {e}");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ImmichError::Transport {
                        endpoint: endpoint.to_string(),
                        source: e,
                    });
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ImmichResult<T> {
        let url = self.url(path);
        let resp = self.send(path, |http| http.get(&url)).await?;
        decode(path, resp).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ImmichResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self
            .send(path, |http| http.request(method.clone(), &url).json(body))
            .await?;
        decode(path, resp).await
    }

    async fn get_bytes(&self, path: &str) -> ImmichResult<(Vec<u8>, String)> {
        let url = self.url(path);
        let resp = self
            .send(path, |http| http.get(&url).header(ACCEPT, "image/*"))
            .await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = resp.bytes().await.map_err(|e| ImmichError::Transport {
            endpoint: path.to_string(),
            source: e,
        })?;
        Ok((bytes.to_vec(), content_type))
    }
}

fn backoff(attempt: u32) -> Duration {
    let millis = 500u64.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

async fn check_status(endpoint: &str, resp: Response) -> ImmichResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(ImmichError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> ImmichResult<T> {
    let bytes = resp.bytes().await.map_err(|e| ImmichError::Transport {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ImmichError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl ImmichApi for ImmichClient {
    async fn ping(&self) -> ImmichResult<bool> {
        let body: Value = self.get_json("/server/ping").await?;
        Ok(body.get("res").and_then(Value::as_str) == Some("pong"))
    }

    async fn server_version(&self) -> ImmichResult<ServerVersion> {
        self.get_json("/server/version").await
    }

    async fn fetch_server_about(&self) -> ImmichResult<ServerAbout> {
        self.get_json("/server/about").await
    }

    async fn describe_credential(&self) -> ImmichResult<ApiKeyRecord> {
        self.get_json("/api-keys/me").await
    }

    async fn list_api_keys(&self) -> ImmichResult<Vec<ApiKeyRecord>> {
        self.get_json("/api-keys").await
    }

    async fn get_api_key(&self, id: &str) -> ImmichResult<ApiKeyRecord> {
        validate_id("API key", id)?;
        self.get_json(&format!("/api-keys/{}", id.trim())).await
    }

    async fn fetch_current_user(&self) -> ImmichResult<UserRecord> {
        self.get_json("/users/me").await
    }

    async fn list_users(&self) -> ImmichResult<Vec<UserRecord>> {
        self.get_json("/users").await
    }

    async fn list_partners(&self) -> ImmichResult<Vec<PartnerRecord>> {
        self.get_json("/partners?direction=shared-by").await
    }

    async fn list_assets(&self, page_size: u32) -> ImmichResult<Vec<AssetRecord>> {
        let query = MetadataQuery {
            size: Some(page_size.max(1)),
            ..Default::default()
        };
        let page: SearchResponse = self
            .send_json(Method::POST, "/search/metadata", &query)
            .await?;
        Ok(page.assets.items)
    }

    async fn get_asset(&self, id: &str) -> ImmichResult<AssetRecord> {
        validate_id("asset", id)?;
        self.get_json(&format!("/assets/{}", id.trim())).await
    }

    async fn get_asset_thumbnail(&self, id: &str) -> ImmichResult<(Vec<u8>, String)> {
        validate_id("asset", id)?;
        self.get_bytes(&format!("/assets/{}/thumbnail?size=thumbnail", id.trim()))
            .await
    }

    async fn upload_asset(&self, request: &UploadRequest) -> ImmichResult<UploadResult> {
        if let Some(album_id) = &request.album_id {
            validate_id("album", album_id)?;
        }

        let data = tokio::fs::read(&request.path).await?;
        let metadata = tokio::fs::metadata(&request.path).await?;
        let file_name = request
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ImmichError::InvalidArgument(format!(
                    "Upload path has no file name: {}",
                    request.path.display()
                ))
            })?
            .to_string();

        let modified: chrono::DateTime<chrono::Utc> = metadata
            .modified()
            .map(Into::into)
            .unwrap_or_else(|_| chrono::Utc::now());
        let created: chrono::DateTime<chrono::Utc> =
            metadata.created().map(Into::into).unwrap_or(modified);
        let device_asset_id = format!("{file_name}-{}-{}", metadata.len(), modified.timestamp());

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| ImmichError::InvalidArgument(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("deviceAssetId", device_asset_id)
            .text("deviceId", request.device_id.clone())
            .text("fileCreatedAt", created.to_rfc3339())
            .text("fileModifiedAt", modified.to_rfc3339())
            .part("assetData", part);

        // Multipart bodies are not replayable, so uploads get one attempt.
        let endpoint = "/assets";
        let resp = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImmichError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            })?;
        let resp = check_status(endpoint, resp).await?;
        let mut result: UploadResult = decode(endpoint, resp).await?;

        tracing::info!(asset_id = %result.id, status = %result.status, "Uploaded {file_name}");

        // The asset exists from here on; a failed album link is reported
        // alongside it rather than failing the upload.
        if let Some(album_id) = &request.album_id {
            result.album_id = Some(album_id.clone());
            result.album_error = match self
                .add_assets_to_album(album_id, std::slice::from_ref(&result.id))
                .await
            {
                Ok(outcomes) => outcomes
                    .into_iter()
                    .find(|o| o.id == result.id && !o.success)
                    .map(|o| o.error.unwrap_or_else(|| "not added".to_string())),
                Err(e) => Some(e.to_string()),
            };
            if let Some(reason) = &result.album_error {
                tracing::warn!(asset_id = %result.id, %album_id, "Uploaded asset not added to album: {reason}");
            }
        }

        Ok(result)
    }

    async fn list_albums(&self, page_size: u32) -> ImmichResult<Vec<AlbumRecord>> {
        let mut albums: Vec<AlbumRecord> = self.get_json("/albums").await?;
        albums.truncate(page_size as usize);
        Ok(albums)
    }

    async fn get_album(&self, id: &str) -> ImmichResult<AlbumRecord> {
        validate_id("album", id)?;
        self.get_json(&format!("/albums/{}", id.trim())).await
    }

    async fn create_album(&self, request: &CreateAlbumRequest) -> ImmichResult<AlbumRecord> {
        if request.album_name.trim().is_empty() {
            return Err(ImmichError::InvalidArgument(
                "Album name must not be empty".to_string(),
            ));
        }
        for id in &request.asset_ids {
            validate_id("asset", id)?;
        }
        self.send_json(Method::POST, "/albums", request).await
    }

    async fn delete_album(&self, id: &str) -> ImmichResult<()> {
        validate_id("album", id)?;
        let path = format!("/albums/{}", id.trim());
        let url = self.url(&path);
        self.send(&path, |http| http.delete(&url)).await?;
        Ok(())
    }

    async fn add_assets_to_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>> {
        validate_id("album", album_id)?;
        for id in asset_ids {
            validate_id("asset", id)?;
        }
        let path = format!("/albums/{}/assets", album_id.trim());
        self.send_json(Method::PUT, &path, &json!({ "ids": asset_ids }))
            .await
    }

    async fn remove_assets_from_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>> {
        validate_id("album", album_id)?;
        for id in asset_ids {
            validate_id("asset", id)?;
        }
        let path = format!("/albums/{}/assets", album_id.trim());
        self.send_json(Method::DELETE, &path, &json!({ "ids": asset_ids }))
            .await
    }

    async fn search_smart(&self, query: &SmartQuery) -> ImmichResult<SearchResponse> {
        if query.query.trim().is_empty() {
            return Err(ImmichError::InvalidArgument(
                "Smart search query must not be empty".to_string(),
            ));
        }
        for id in &query.album_ids {
            validate_id("album", id)?;
        }
        self.send_json(Method::POST, "/search/smart", query).await
    }

    async fn search_metadata(&self, query: &MetadataQuery) -> ImmichResult<SearchResponse> {
        self.send_json(Method::POST, "/search/metadata", query).await
    }

    async fn search_random(&self, size: u32) -> ImmichResult<Vec<AssetRecord>> {
        self.send_json(Method::POST, "/search/random", &json!({ "size": size.max(1) }))
            .await
    }

    async fn list_people(&self, page: u32, size: u32) -> ImmichResult<PeoplePage> {
        self.get_json(&format!("/people?page={}&size={}", page.max(1), size.max(1)))
            .await
    }

    async fn get_person(&self, id: &str) -> ImmichResult<PersonRecord> {
        validate_id("person", id)?;
        self.get_json(&format!("/people/{}", id.trim())).await
    }

    async fn get_person_thumbnail(&self, id: &str) -> ImmichResult<(Vec<u8>, String)> {
        validate_id("person", id)?;
        self.get_bytes(&format!("/people/{}/thumbnail", id.trim()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(2), Duration::from_millis(1000));
        assert_eq!(backoff(3), Duration::from_millis(2000));
        assert_eq!(backoff(10), MAX_BACKOFF);
    }

    #[test]
    fn rejects_api_key_with_newline() {
        let config = ImmichConfig::new("http://localhost:2283", "abcdefghij\nklm").unwrap();
        assert!(ImmichClient::new(&config).is_err());
    }
}
