//! SearchScape MCP Server: fetch images by prompt and transform them with hosted models.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use session::ImageSessionManager;
pub use transport::StdioTransport;
