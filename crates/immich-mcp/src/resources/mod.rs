//! MCP resource implementations.

pub mod account;
pub mod api_keys;
pub mod library;
pub mod permissions;
pub mod registry;
pub mod templates;

pub use registry::ResourceRegistry;

use immich_core::ImmichError;

use crate::types::McpError;

/// Error for a resource whose Immich read failed or came back unusable.
pub(crate) fn fetch_failed(what: &str, source: ImmichError) -> McpError {
    tracing::warn!(kind = source.kind(), "Failed to fetch {what}: {source}");
    McpError::immich(format!("Failed to fetch {what} from Immich API"), source)
}
