//! Request dispatcher: receives JSON-RPC messages and routes them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// Dispatches incoming JSON-RPC messages against one [`AppContext`].
///
/// Cheap to clone; clones share negotiation state and in-flight requests.
#[derive(Clone)]
pub struct ProtocolHandler {
    context: Arc<AppContext>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
    in_flight: Arc<Mutex<HashMap<RequestId, CancellationToken>>>,
}

impl ProtocolHandler {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            context,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    pub async fn is_initialized(&self) -> bool {
        self.capabilities.lock().await.initialized
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            _ => {
                tracing::warn!("Received unexpected message type from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return serde_json::to_value(e.to_json_rpc_error(request.id)).unwrap_or_default();
        }

        let id = request.id.clone();
        let token = match self.in_flight.lock().await.entry(id.clone()) {
            Entry::Occupied(_) => {
                let e = McpError::InvalidRequest(format!("Request id {id} is already in flight"));
                return serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default();
            }
            Entry::Vacant(slot) => slot.insert(self.context.request_token()).clone(),
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(McpError::RequestCancelled),
            result = self.dispatch_request(&request, &token) => result,
        };

        self.in_flight.lock().await.remove(&id);

        match result {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(method = %request.method, code = e.code(), "Request failed: {e}");
                serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default()
            }
        }
    }

    async fn dispatch_request(
        &self,
        request: &JsonRpcRequest,
        cancel: &CancellationToken,
    ) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.clone()).await,
            "shutdown" => self.handle_shutdown().await,

            "tools/list" => self.handle_tools_list().await,
            "tools/call" => self.handle_tools_call(request.params.clone(), cancel).await,

            "resources/list" => self.handle_resources_list().await,
            "resources/templates/list" => self.handle_resource_templates_list().await,
            "resources/read" => self.handle_resources_read(request.params.clone(), cancel).await,

            "ping" => Ok(Value::Object(serde_json::Map::new())),

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => {
                let mut caps = self.capabilities.lock().await;
                caps.mark_initialized();
            }
            "notifications/cancelled" => {
                let params: Option<CancelledParams> = notification
                    .params
                    .and_then(|p| serde_json::from_value(p).ok());
                match params {
                    Some(params) => self.cancel_request(&params).await,
                    None => tracing::warn!("Cancellation notification without a requestId"),
                }
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn cancel_request(&self, params: &CancelledParams) {
        let key = &params.request_id;
        match self.in_flight.lock().await.get(key) {
            Some(token) => {
                tracing::info!(
                    request_id = %key,
                    reason = params.reason.as_deref().unwrap_or("unspecified"),
                    "Cancelling request"
                );
                token.cancel();
            }
            None => tracing::debug!(request_id = %key, "Cancellation for unknown or finished request"),
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Initialize params required".to_string()))?;

        let mut caps = self.capabilities.lock().await;
        let result = caps.negotiate(init_params);

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_shutdown(&self) -> McpResult<Value> {
        tracing::info!("Shutdown requested");
        for token in self.in_flight.lock().await.values() {
            token.cancel();
        }
        Ok(Value::Object(serde_json::Map::new()))
    }

    async fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(
        &self,
        params: Option<Value>,
        cancel: &CancellationToken,
    ) -> McpResult<Value> {
        let call_params: ToolCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Tool call params required".to_string()))?;

        tracing::debug!(tool = %call_params.name, "Calling tool");
        let result =
            ToolRegistry::call(&call_params.name, call_params.arguments, &self.context, cancel)
                .await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_resources_list(&self) -> McpResult<Value> {
        let result = ResourceListResult {
            resources: ResourceRegistry::list_resources(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_resource_templates_list(&self) -> McpResult<Value> {
        let result = ResourceTemplateListResult {
            resource_templates: ResourceRegistry::list_templates(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_resources_read(
        &self,
        params: Option<Value>,
        cancel: &CancellationToken,
    ) -> McpResult<Value> {
        let read_params: ResourceReadParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Resource read params required".to_string()))?;

        let result = ResourceRegistry::read(&read_params.uri, &self.context, cancel).await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}
