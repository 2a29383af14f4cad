//! HTTP transport: JSON-RPC over `POST /mcp`, liveness on `GET /health`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{
    error_codes, mcp_error_codes, JsonRpcError, JsonRpcMessage, McpError, McpResult, RequestId,
    SERVER_NAME, SERVER_VERSION,
};

pub struct ServerState {
    pub token: Option<String>,
    pub handler: ProtocolHandler,
}

pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self::with_token(handler, None)
    }

    /// Require `Authorization: Bearer <token>` on `/mcp` when `token` is set.
    pub fn with_token(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState { token, handler }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();
        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(state)
    }

    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");
        if self.state.token.is_none() {
            tracing::warn!("No bearer token configured; /mcp is open to anyone who can connect");
        }

        let context = self.state.handler.context().clone();
        let shutdown = context.request_token();

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => tracing::info!("Interrupt received"),
                    _ = shutdown.cancelled() => {}
                }
            })
            .await
            .map_err(|e| McpError::Transport(e.to_string()));

        context.shutdown();
        served
    }
}

fn rpc_error(status: StatusCode, code: i32, message: &str) -> Response {
    let body = JsonRpcError::new(RequestId::Null, code, message.to_string());
    (status, AxumJson(body)).into_response()
}

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
            return rpc_error(
                StatusCode::UNAUTHORIZED,
                mcp_error_codes::UNAUTHORIZED,
                &McpError::Unauthorized.to_string(),
            );
        }
    }

    next.run(request).await
}

async fn handle_request(
    State(state): State<Arc<ServerState>>,
    AxumJson(body): AxumJson<Value>,
) -> Response {
    let msg: JsonRpcMessage = match serde_json::from_value(body) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!("Rejected HTTP body: {e}");
            return rpc_error(StatusCode::BAD_REQUEST, error_codes::PARSE_ERROR, "Parse error");
        }
    };

    match state.handler.handle_message(msg).await {
        Some(response) => AxumJson(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let context = state.handler.context();
    AxumJson(json!({
        "status": if context.is_shut_down() { "stopping" } else { "ok" },
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "initialized": state.handler.is_initialized().await,
    }))
}
