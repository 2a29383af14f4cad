//! MCP protocol handling: JSON-RPC dispatch and version negotiation.

pub mod handler;
pub mod negotiation;
pub mod validator;

pub use handler::ProtocolHandler;
