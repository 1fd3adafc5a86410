//! MCP tool implementations.

pub mod fetch_image;
pub mod registry;
pub mod transform_image;

pub use registry::ToolRegistry;
