//! Resource: searchscape://images

use crate::types::{BlobContent, ReadResourceResult, ResourceDefinition};

pub const IMAGES_URI: &str = "searchscape://images";
pub const IMAGES_MIME: &str = "image/jpeg";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: IMAGES_URI.to_string(),
        name: "Fetched and Transformed Images".to_string(),
        description: Some(
            "Placeholder for fetched and transformed images; image URLs are returned by the tools"
                .to_string(),
        ),
        mime_type: Some(IMAGES_MIME.to_string()),
    }
}

/// The images resource carries no payload; clients follow the URLs in tool results.
pub fn read_images() -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![BlobContent {
            uri: IMAGES_URI.to_string(),
            mime_type: IMAGES_MIME.to_string(),
            blob: String::new(),
        }],
    }
}
