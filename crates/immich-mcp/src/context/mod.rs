//! Application context: the Immich handle and its lifetime.
//!
//! Built once at startup and passed explicitly to the protocol handler.
//! Dropping the last reference cancels the shutdown token, which aborts any
//! outstanding Immich calls started from it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use immich_core::{ImmichApi, ImmichClient, ImmichConfig, PermissionProber};

use crate::types::{McpError, McpResult};

pub const DEFAULT_DEVICE_ID: &str = "immich-mcp";

pub struct AppContext {
    api: Arc<dyn ImmichApi>,
    prober: PermissionProber,
    device_id: String,
    shutdown: CancellationToken,
}

impl AppContext {
    pub fn new(api: Arc<dyn ImmichApi>) -> Self {
        Self {
            api,
            prober: PermissionProber::default(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Build an HTTP client from `config` and check the server is reachable.
    ///
    /// An unreachable server is logged, not fatal: tools report the failure
    /// when they are called.
    pub async fn connect(config: &ImmichConfig) -> McpResult<Self> {
        let client = ImmichClient::new(config)
            .map_err(|e| McpError::immich("Failed to create Immich client", e))?;

        if client.test_connection().await {
            tracing::info!("Connected to Immich at {}", client.api_base());
        } else {
            tracing::warn!(
                "Could not connect to Immich at {}; functionality may be limited",
                client.api_base()
            );
        }

        Ok(Self::new(Arc::new(client)))
    }

    pub fn with_prober(mut self, prober: PermissionProber) -> Self {
        self.prober = prober;
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn api(&self) -> &dyn ImmichApi {
        self.api.as_ref()
    }

    pub fn prober(&self) -> &PermissionProber {
        &self.prober
    }

    /// Device identifier attached to uploads.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// A token cancelled when the context shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            tracing::info!("Shutting down application context");
            self.shutdown.cancel();
        }
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
