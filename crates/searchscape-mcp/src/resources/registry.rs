//! Resource registration and dispatch.

use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::images;

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        Vec::new()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        vec![images::definition()]
    }

    pub fn read(uri: &str) -> McpResult<ReadResourceResult> {
        match uri {
            images::IMAGES_URI => Ok(images::read_images()),
            _ => Err(McpError::ResourceNotFound(uri.to_string())),
        }
    }
}
