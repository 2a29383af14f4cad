//! Permission prober behaviour against scripted API handles.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map};
use tokio_util::sync::CancellationToken;

use immich_core::*;

// ─────────────────────── scripted handle ───────────────────────

/// How a scripted endpoint answers.
#[derive(Clone, Copy, PartialEq)]
enum Reply {
    /// Succeeds with a non-empty payload.
    Ok,
    /// Succeeds with an empty list.
    Empty,
    /// HTTP 403.
    Denied,
    /// HTTP 404.
    Missing,
    /// 200 with a body that does not decode.
    Garbage,
    /// Cancels the shared token and never answers.
    Hang,
}

struct ScriptedApi {
    describe: Reply,
    permissions: Option<Vec<&'static str>>,
    user: Reply,
    assets: Reply,
    albums: Reply,
    about: Reply,
    calls: Mutex<Vec<&'static str>>,
    cancel: CancellationToken,
}

impl ScriptedApi {
    fn new() -> Self {
        Self {
            describe: Reply::Missing,
            permissions: None,
            user: Reply::Ok,
            assets: Reply::Ok,
            albums: Reply::Ok,
            about: Reply::Ok,
            calls: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    async fn answer(&self, endpoint: &str, reply: Reply) -> ImmichResult<bool> {
        match reply {
            Reply::Ok => Ok(true),
            Reply::Empty => Ok(false),
            Reply::Denied => Err(ImmichError::Status {
                endpoint: endpoint.to_string(),
                status: 403,
                body: "Forbidden".to_string(),
            }),
            Reply::Missing => Err(ImmichError::Status {
                endpoint: endpoint.to_string(),
                status: 404,
                body: "Not Found".to_string(),
            }),
            Reply::Garbage => Err(ImmichError::Decode {
                endpoint: endpoint.to_string(),
                message: "expected value at line 1 column 1".to_string(),
            }),
            Reply::Hang => {
                self.cancel.cancel();
                std::future::pending().await
            }
        }
    }
}

fn asset() -> AssetRecord {
    serde_json::from_value(json!({
        "id": "a1", "type": "IMAGE", "originalFileName": "test.jpg"
    }))
    .unwrap()
}

fn album() -> AlbumRecord {
    serde_json::from_value(json!({ "id": "al1", "albumName": "Holidays" })).unwrap()
}

fn unused<T>() -> ImmichResult<T> {
    Err(ImmichError::InvalidArgument("not scripted".to_string()))
}

#[async_trait]
impl ImmichApi for ScriptedApi {
    async fn ping(&self) -> ImmichResult<bool> {
        Ok(true)
    }

    async fn server_version(&self) -> ImmichResult<ServerVersion> {
        unused()
    }

    async fn fetch_server_about(&self) -> ImmichResult<ServerAbout> {
        self.record("fetch_server_about");
        self.answer("/server/about", self.about).await?;
        Ok(ServerAbout {
            version: "v1.132.3".to_string(),
            extra: Map::new(),
        })
    }

    async fn describe_credential(&self) -> ImmichResult<ApiKeyRecord> {
        self.record("describe_credential");
        self.answer("/api-keys/me", self.describe).await?;
        Ok(ApiKeyRecord {
            id: "key-1".to_string(),
            name: "My API Key".to_string(),
            permissions: self
                .permissions
                .as_ref()
                .map(|p| p.iter().map(|s| s.to_string()).collect()),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        })
    }

    async fn list_api_keys(&self) -> ImmichResult<Vec<ApiKeyRecord>> {
        unused()
    }

    async fn get_api_key(&self, _id: &str) -> ImmichResult<ApiKeyRecord> {
        unused()
    }

    async fn fetch_current_user(&self) -> ImmichResult<UserRecord> {
        self.record("fetch_current_user");
        self.answer("/users/me", self.user).await?;
        Ok(UserRecord {
            id: "test-user-id".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            extra: Map::new(),
        })
    }

    async fn list_users(&self) -> ImmichResult<Vec<UserRecord>> {
        unused()
    }

    async fn list_partners(&self) -> ImmichResult<Vec<PartnerRecord>> {
        unused()
    }

    async fn list_assets(&self, page_size: u32) -> ImmichResult<Vec<AssetRecord>> {
        self.record("list_assets");
        assert_eq!(page_size, permissions::PROBE_PAGE_SIZE);
        let has = self.answer("/search/metadata", self.assets).await?;
        Ok(if has { vec![asset()] } else { Vec::new() })
    }

    async fn get_asset(&self, _id: &str) -> ImmichResult<AssetRecord> {
        unused()
    }

    async fn get_asset_thumbnail(&self, _id: &str) -> ImmichResult<(Vec<u8>, String)> {
        unused()
    }

    async fn upload_asset(&self, _request: &UploadRequest) -> ImmichResult<UploadResult> {
        unused()
    }

    async fn list_albums(&self, page_size: u32) -> ImmichResult<Vec<AlbumRecord>> {
        self.record("list_albums");
        assert_eq!(page_size, permissions::PROBE_PAGE_SIZE);
        let has = self.answer("/albums", self.albums).await?;
        Ok(if has { vec![album()] } else { Vec::new() })
    }

    async fn get_album(&self, _id: &str) -> ImmichResult<AlbumRecord> {
        unused()
    }

    async fn create_album(&self, _request: &CreateAlbumRequest) -> ImmichResult<AlbumRecord> {
        unused()
    }

    async fn delete_album(&self, _id: &str) -> ImmichResult<()> {
        unused()
    }

    async fn add_assets_to_album(
        &self,
        _album_id: &str,
        _asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>> {
        unused()
    }

    async fn remove_assets_from_album(
        &self,
        _album_id: &str,
        _asset_ids: &[String],
    ) -> ImmichResult<Vec<BulkIdResult>> {
        unused()
    }

    async fn search_smart(&self, _query: &SmartQuery) -> ImmichResult<SearchResponse> {
        unused()
    }

    async fn search_metadata(&self, _query: &MetadataQuery) -> ImmichResult<SearchResponse> {
        unused()
    }

    async fn search_random(&self, _size: u32) -> ImmichResult<Vec<AssetRecord>> {
        unused()
    }

    async fn list_people(&self, _page: u32, _size: u32) -> ImmichResult<PeoplePage> {
        unused()
    }

    async fn get_person(&self, _id: &str) -> ImmichResult<PersonRecord> {
        unused()
    }

    async fn get_person_thumbnail(&self, _id: &str) -> ImmichResult<(Vec<u8>, String)> {
        unused()
    }
}

fn set(tags: &[&str]) -> CapabilitySet {
    tags.iter().copied().collect()
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn authoritative_list_short_circuits_probing() {
    let api = ScriptedApi {
        describe: Reply::Ok,
        permissions: Some(vec!["asset.read", "album.read"]),
        ..ScriptedApi::new()
    };

    let caps = probe_permissions(&api, &CancellationToken::new()).await.unwrap();

    assert_eq!(caps, set(&["asset.read", "album.read"]));
    assert_eq!(api.calls(), vec!["describe_credential"]);
}

#[tokio::test]
async fn authoritative_record_is_returned_verbatim() {
    let api = ScriptedApi {
        describe: Reply::Ok,
        permissions: Some(vec!["user.read", "server.about"]),
        ..ScriptedApi::new()
    };

    let report = PermissionProber::new()
        .probe_report(&api, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.source, CapabilitySource::Authoritative);
    assert_eq!(report.capabilities, set(&["user.read", "server.about"]));
    let calls = api.calls();
    assert!(!calls.contains(&"fetch_current_user"));
    assert!(!calls.contains(&"list_assets"));
    assert!(!calls.contains(&"list_albums"));
    assert!(!calls.contains(&"fetch_server_about"));
}

#[tokio::test]
async fn empty_authoritative_list_is_still_authoritative() {
    let api = ScriptedApi {
        describe: Reply::Ok,
        permissions: Some(Vec::new()),
        ..ScriptedApi::new()
    };

    let report = PermissionProber::new()
        .probe_report(&api, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.source, CapabilitySource::Authoritative);
    assert!(report.capabilities.is_empty());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn fallback_collects_one_tag_per_successful_probe() {
    let api = ScriptedApi {
        describe: Reply::Denied,
        user: Reply::Ok,
        assets: Reply::Denied,
        albums: Reply::Ok,
        about: Reply::Ok,
        ..ScriptedApi::new()
    };

    let caps = probe_permissions(&api, &CancellationToken::new()).await.unwrap();

    assert_eq!(caps, set(&["user.read", "album.read", "server.about"]));
    assert_eq!(
        api.calls(),
        vec![
            "describe_credential",
            "fetch_current_user",
            "list_assets",
            "list_albums",
            "fetch_server_about"
        ]
    );
}

#[tokio::test]
async fn everything_denied_yields_empty_set() {
    let api = ScriptedApi {
        describe: Reply::Denied,
        user: Reply::Denied,
        assets: Reply::Denied,
        albums: Reply::Missing,
        about: Reply::Garbage,
        ..ScriptedApi::new()
    };

    let report = PermissionProber::new()
        .probe_report(&api, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.source, CapabilitySource::Empirical);
    assert!(report.capabilities.is_empty());
    assert_eq!(api.calls().len(), 5);
}

#[tokio::test]
async fn probe_order_does_not_change_result() {
    use Probe::*;

    let orders = [
        vec![CurrentUser, Assets, Albums, ServerAbout],
        vec![ServerAbout, Albums, Assets, CurrentUser],
        vec![Albums, CurrentUser, ServerAbout, Assets],
        vec![Assets, ServerAbout, CurrentUser, Albums],
    ];

    let mut results = Vec::new();
    for order in orders {
        let api = ScriptedApi {
            describe: Reply::Missing,
            user: Reply::Ok,
            assets: Reply::Denied,
            albums: Reply::Ok,
            about: Reply::Ok,
            ..ScriptedApi::new()
        };
        let caps = PermissionProber::with_probes(order)
            .probe_permissions(&api, &CancellationToken::new())
            .await
            .unwrap();
        results.push(caps);
    }

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0], set(&["user.read", "album.read", "server.about"]));
}

#[tokio::test]
async fn repeated_probing_is_idempotent() {
    let api = ScriptedApi {
        describe: Reply::Denied,
        albums: Reply::Empty,
        ..ScriptedApi::new()
    };
    let cancel = CancellationToken::new();

    let first = probe_permissions(&api, &cancel).await.unwrap();
    let second = probe_permissions(&api, &cancel).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, set(&["user.read", "asset.read", "server.about"]));
}

#[tokio::test]
async fn authoritative_record_without_list_falls_back() {
    let api = ScriptedApi {
        describe: Reply::Ok,
        permissions: None,
        ..ScriptedApi::new()
    };

    let report = PermissionProber::new()
        .probe_report(&api, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.source, CapabilitySource::Empirical);
    assert_eq!(
        report.capabilities,
        set(&["user.read", "asset.read", "album.read", "server.about"])
    );
    assert_eq!(api.calls().len(), 5);
}

#[tokio::test]
async fn empty_library_reads_as_denied() {
    let api = ScriptedApi {
        describe: Reply::Garbage,
        assets: Reply::Empty,
        albums: Reply::Empty,
        ..ScriptedApi::new()
    };

    let caps = probe_permissions(&api, &CancellationToken::new()).await.unwrap();

    assert!(!caps.contains("asset.read"));
    assert!(!caps.contains("album.read"));
    assert_eq!(caps, set(&["user.read", "server.about"]));
}

#[tokio::test]
async fn cancellation_before_start_issues_no_calls() {
    let api = ScriptedApi::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = probe_permissions(&api, &cancel).await;

    assert_eq!(result, Err(ProbeCancelled));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn cancellation_mid_probe_discards_collected_tags() {
    let api = ScriptedApi {
        describe: Reply::Denied,
        user: Reply::Ok,
        assets: Reply::Hang,
        ..ScriptedApi::new()
    };
    let cancel = api.cancel.clone();

    let result = probe_permissions(&api, &cancel).await;

    assert_eq!(result, Err(ProbeCancelled));
    assert_eq!(
        api.calls(),
        vec!["describe_credential", "fetch_current_user", "list_assets"]
    );
}
