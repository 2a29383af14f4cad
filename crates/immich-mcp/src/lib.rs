//! Immich MCP server: an Immich photo library as MCP tools and resources.

pub mod config;
pub mod context;
pub mod protocol;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ConnectionArgs;
pub use context::AppContext;
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;
