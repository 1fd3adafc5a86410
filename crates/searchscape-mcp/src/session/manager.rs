//! Per-user image sessions and the upstream clients that feed them.

use searchscape::{InferenceClient, SearchClient, SessionStore};

use crate::config::ServerConfig;

/// Owns the session store and the two upstream clients.
///
/// Shared as `Arc<Mutex<ImageSessionManager>>`. Clients are cheap to clone, so
/// callers clone one out and release the lock before any network call.
pub struct ImageSessionManager {
    store: SessionStore,
    search: SearchClient,
    inference: InferenceClient,
}

impl ImageSessionManager {
    pub fn new(config: &ServerConfig) -> Self {
        let missing = config.missing_keys();
        if !missing.is_empty() {
            tracing::warn!(
                "Missing credentials: {}. Calls needing them will fail upstream.",
                missing.join(", ")
            );
        }

        tracing::info!(
            "Search provider: {}; inference provider: {}; timeout {}s",
            config.unsplash_url,
            config.hf_url,
            config.timeout.as_secs()
        );

        Self {
            store: SessionStore::new(),
            search: SearchClient::new(
                &config.unsplash_url,
                &config.unsplash_access_key,
                config.timeout,
            ),
            inference: InferenceClient::new(&config.hf_url, &config.hf_api_key, config.timeout),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn search_client(&self) -> SearchClient {
        self.search.clone()
    }

    pub fn inference_client(&self) -> InferenceClient {
        self.inference.clone()
    }

    /// Image URL last fetched for `user_id`.
    pub fn image_for(&self, user_id: &str) -> Option<String> {
        self.store.get(user_id).map(str::to_string)
    }

    /// Record a freshly fetched image for `user_id`.
    pub fn remember(&mut self, user_id: &str, image_url: &str) {
        self.store.set(user_id, image_url);
    }
}
