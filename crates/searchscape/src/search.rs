//! Image-search provider client (Unsplash random-photo endpoint).

use std::time::Duration;

use serde_json::Value;

use crate::types::{SearchScapeError, SearchScapeResult};

/// Client for the image-search provider.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl SearchClient {
    pub fn new(base_url: &str, access_key: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one random photo matching `query` and return its regular-size URL.
    pub async fn random_photo(&self, query: &str) -> SearchScapeResult<String> {
        let url = format!("{}/photos/random", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("query", query), ("client_id", self.access_key.as_str())])
            .send()
            .await
            .map_err(|e| SearchScapeError::Upstream(format!("Unsplash API unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchScapeError::Upstream(format!(
                "Unsplash API error: {}",
                status.as_u16()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            tracing::debug!("Unsplash body is not JSON: {e}");
            invalid_response()
        })?;

        regular_url(&body).ok_or_else(invalid_response)
    }
}

fn regular_url(body: &Value) -> Option<String> {
    body.pointer("/urls/regular")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn invalid_response() -> SearchScapeError {
    SearchScapeError::Upstream("Invalid response from Unsplash API".to_string())
}
