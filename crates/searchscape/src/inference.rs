//! Model-inference provider client (Hugging Face Inference API).

use std::time::Duration;

use serde_json::Value;

use crate::filter::Filter;
use crate::types::{SearchScapeError, SearchScapeResult};

/// Client for the model-inference provider.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl InferenceClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full endpoint URL for `filter`.
    pub fn endpoint(&self, filter: Filter) -> String {
        format!("{}/{}", self.base_url, filter.model_path())
    }

    /// Run `filter` on `image_url` and return the generated image reference.
    pub async fn transform(&self, filter: Filter, image_url: &str) -> SearchScapeResult<String> {
        let endpoint = self.endpoint(filter);
        tracing::debug!("POST {endpoint} for filter '{filter}'");

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&filter.request_body(image_url))
            .send()
            .await
            .map_err(|e| {
                SearchScapeError::Upstream(format!("Hugging Face API unreachable: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchScapeError::Upstream(format!(
                "Hugging Face API error: {}",
                status.as_u16()
            )));
        }

        let missing = || SearchScapeError::Upstream(filter.missing_output_message().to_string());

        let body: Value = resp.json().await.map_err(|e| {
            tracing::debug!("Inference body for '{filter}' is not JSON: {e}");
            missing()
        })?;

        generated_image(&body).ok_or_else(missing)
    }
}

fn generated_image(body: &Value) -> Option<String> {
    body.get(0)
        .and_then(|first| first.get("generated_image"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
