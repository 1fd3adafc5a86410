//! The fetch-image tool: find a photo for a prompt and remember it for the user.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use searchscape::SearchScapeResult;

use crate::session::ImageSessionManager;
use crate::types::{ToolCallResult, ToolDefinition};

use super::registry::{into_result, parse_args, require_arg, USER_ID_REQUIRED};

pub const NAME: &str = "fetch-image";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchParams {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some("Fetch an image from Unsplash based on a user's prompt.".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string", "description": "Describe the image to fetch" },
                "userId": { "type": "string", "description": "User session ID" }
            },
            "required": ["prompt", "userId"]
        }),
    }
}

pub async fn execute(args: Value, session: &Arc<Mutex<ImageSessionManager>>) -> ToolCallResult {
    into_result(NAME, fetch(args, session).await)
}

async fn fetch(args: Value, session: &Arc<Mutex<ImageSessionManager>>) -> SearchScapeResult<String> {
    let params: FetchParams = parse_args(args)?;
    let user_id = require_arg(params.user_id, USER_ID_REQUIRED)?;
    let prompt = require_arg(params.prompt, "Prompt is missing")?;

    let search = session.lock().await.search_client();
    let image_url = search.random_photo(&prompt).await?;

    session.lock().await.remember(&user_id, &image_url);
    tracing::info!("Fetched image for user {user_id}: {image_url}");

    Ok(format!("Image fetched successfully! Image URL: {image_url}"))
}
