//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use searchscape::{SearchScapeError, SearchScapeResult};

use crate::session::ImageSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{fetch_image, transform_image};

pub const USER_ID_REQUIRED: &str = "UserId is required to track the sessions";

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![fetch_image::definition(), transform_image::definition()]
    }

    /// Run a tool. Failures inside the tool come back as an error result;
    /// only an unknown tool name is a protocol error.
    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        session: &Arc<Mutex<ImageSessionManager>>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            fetch_image::NAME => Ok(fetch_image::execute(args, session).await),
            transform_image::NAME => Ok(transform_image::execute(args, session).await),
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}

/// Decode tool arguments, reporting shape errors as validation failures.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> SearchScapeResult<T> {
    serde_json::from_value(args)
        .map_err(|e| SearchScapeError::Validation(format!("Invalid arguments: {e}")))
}

/// A required string argument; absent or blank values are rejected with `message`.
/// Accepted values are returned as given, so `"u1 "` and `"u1"` stay distinct keys.
pub(crate) fn require_arg(value: Option<String>, message: &str) -> SearchScapeResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SearchScapeError::Validation(message.to_string()))
}

/// Turn a tool outcome into the result sent to the client.
pub(crate) fn into_result(tool: &str, outcome: SearchScapeResult<String>) -> ToolCallResult {
    match outcome {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => {
            tracing::error!("{tool} failed ({} error): {e}", e.kind());
            ToolCallResult::error(format!("Error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_arg_rejects_blank() {
        assert!(require_arg(None, "missing").is_err());
        assert!(require_arg(Some("   ".to_string()), "missing").is_err());
        assert_eq!(require_arg(Some(" u1 ".to_string()), "missing").unwrap(), " u1 ");
    }

    #[test]
    fn test_into_result_flags_errors() {
        let result = into_result(
            "fetch-image",
            Err(SearchScapeError::Validation("Prompt is missing".to_string())),
        );
        assert!(result.is_error());
        assert_eq!(result.joined_text(), "Error: Prompt is missing");
    }

    #[test]
    fn test_tool_names() {
        let names: Vec<String> = ToolRegistry::list_tools()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["fetch-image", "transform-image"]);
    }
}
