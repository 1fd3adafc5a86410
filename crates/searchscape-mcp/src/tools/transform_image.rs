//! The transform-image tool: run a hosted model filter on the user's fetched image.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use searchscape::{Filter, SearchScapeError, SearchScapeResult};

use crate::session::ImageSessionManager;
use crate::types::{ToolCallResult, ToolDefinition};

use super::registry::{into_result, parse_args, require_arg, USER_ID_REQUIRED};

pub const NAME: &str = "transform-image";

pub const NO_IMAGE: &str = "No image found. Please fetch an image first using fetch-image";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformParams {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    let names: Vec<&str> = Filter::ALL.iter().map(|f| f.name()).collect();
    let listed = names.join(", ");

    ToolDefinition {
        name: NAME.to_string(),
        description: Some(format!(
            "Apply a visual transformation to the last fetched image ({listed})"
        )),
        input_schema: json!({
            "type": "object",
            "properties": {
                "filter": {
                    "type": "string",
                    "enum": &names,
                    "description": format!("Type of filter ({listed})")
                },
                "userId": { "type": "string", "description": "User session ID" }
            },
            "required": ["filter", "userId"]
        }),
    }
}

pub async fn execute(args: Value, session: &Arc<Mutex<ImageSessionManager>>) -> ToolCallResult {
    into_result(NAME, transform(args, session).await)
}

async fn transform(
    args: Value,
    session: &Arc<Mutex<ImageSessionManager>>,
) -> SearchScapeResult<String> {
    let params: TransformParams = parse_args(args)?;
    let user_id = require_arg(params.user_id, USER_ID_REQUIRED)?;
    let filter_name = require_arg(params.filter, "Filter type is missing")?;

    let (image_url, inference) = {
        let session = session.lock().await;
        (session.image_for(&user_id), session.inference_client())
    };
    let image_url =
        image_url.ok_or_else(|| SearchScapeError::Precondition(NO_IMAGE.to_string()))?;

    let filter: Filter = filter_name.parse()?;
    tracing::info!("Applying filter '{filter}' to image for user {user_id}: {image_url}");

    let transformed = inference.transform(filter, &image_url).await?;
    tracing::info!("Transformed image for user {user_id}: {transformed}");

    Ok(format!(
        "Image transformed with {filter_name} filter successfully! Transformed image URL: {transformed}"
    ))
}
