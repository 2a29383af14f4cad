//! MCP tool implementations, grouped by the part of Immich they touch.

pub mod albums;
pub mod assets;
pub mod people;
pub mod registry;
pub mod search;
pub mod server;
mod support;

pub use registry::ToolRegistry;
