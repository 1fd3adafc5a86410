//! MCP resource implementations.

pub mod images;
pub mod registry;

pub use registry::ResourceRegistry;
