//! In-memory mapping from session identifier to the last fetched image URL.

use std::collections::HashMap;

/// Per-user image sessions. Entries live until the process exits.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    images: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `image_url` for `session_id`, replacing any previous entry.
    pub fn set(&mut self, session_id: &str, image_url: &str) {
        if let Some(previous) = self
            .images
            .insert(session_id.to_string(), image_url.to_string())
        {
            tracing::debug!("Replaced image for session '{session_id}': {previous}");
        }
    }

    /// The image URL last recorded for `session_id`.
    pub fn get(&self, session_id: &str) -> Option<&str> {
        self.images.get(session_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// All session identifiers, sorted.
    pub fn session_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.images.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
