//! HTTP transport: JSON-RPC over POST /mcp with optional bearer auth, plus /health.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    pub fn new(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();

        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// A JSON-RPC error body for failures that happen before a request id is known.
fn rpc_failure(status: StatusCode, err: McpError) -> Response {
    (status, AxumJson(err.to_json_rpc_error(RequestId::Null))).into_response()
}

/// Bearer-token check, active only when a token is configured.
/// /health is routed outside this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected /mcp request without a valid bearer token");
            return rpc_failure(StatusCode::UNAUTHORIZED, McpError::Unauthorized);
        }
    }

    next.run(request).await
}

/// Takes the raw body so a bad payload or a missing content type still gets a
/// JSON-RPC parse error instead of the extractor's plain-text rejection.
async fn handle_request(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Response, Response> {
    let msg = framing::decode_line(&body).map_err(|e| {
        tracing::warn!("Parse error on /mcp: {e}");
        rpc_failure(StatusCode::BAD_REQUEST, e)
    })?;

    // Notifications get an empty 202.
    Ok(match state.handler.handle_message(msg).await {
        Some(response) => AxumJson(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    })
}

/// Health check. Not behind auth.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let sessions = state.handler.session().lock().await.store().len();

    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
    }))
}
