//! The central Model Context Protocol engine
//!
//! Routes each decoded request to the session handshake (`initialize`, `ping`), tool
//! enumeration (`tools/list`) or tool invocation (`tools/call`).

use std::time::Instant;

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ListToolsResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::logging::{log_request_summary, Outcome};
use crate::mcp::rpc::{
    app_error_to_json_rpc, decode_request, json_rpc_error, json_rpc_result,
    json_rpc_result_from, RequestEnvelope, ResponseEnvelope, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::{errors::AppError, AppState};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

/// Decodes one input line and dispatches it. `None` means nothing is written back.
pub async fn handle_line(state: &AppState, line: &str) -> Option<ResponseEnvelope> {
    match decode_request(line) {
        Ok(request) => handle_request(state, request).await,
        Err(err) => {
            warn!(error = %err, "undecodable request line");
            Some(json_rpc_error(None, PARSE_ERROR, &err.to_string()))
        }
    }
}

pub async fn handle_request(
    state: &AppState,
    request: RequestEnvelope,
) -> Option<ResponseEnvelope> {
    let started_at = Instant::now();
    let RequestEnvelope { id, method, params } = request;

    let Some(method) = method.filter(|method| !method.trim().is_empty()) else {
        return id.map(|id| json_rpc_error(Some(id), INVALID_REQUEST, "Invalid Request"));
    };

    let response = match method.as_str() {
        "initialize" => Some(handle_initialize(id)),
        "ping" => Some(json_rpc_result(id, json!({}))),
        "tools/list" => Some(handle_tools_list(state, id)),
        "tools/call" => Some(handle_tools_call(state, id, params).await),
        _ if id.is_some() => Some(json_rpc_error(id, METHOD_NOT_FOUND, "Method not found")),
        _ => None,
    };

    let outcome = match &response {
        Some(response) if response.is_error() => Outcome::Failure,
        Some(_) => Outcome::Success,
        None => Outcome::Dropped,
    };
    log_request_summary(&method, outcome, started_at);

    response
}

pub fn handle_initialize(id: Option<Value>) -> ResponseEnvelope {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    json_rpc_result_from(id, &initialize_result)
}

pub fn handle_tools_list(state: &AppState, id: Option<Value>) -> ResponseEnvelope {
    json_rpc_result_from(
        id,
        &ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: state.registry.descriptors(),
        },
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> ResponseEnvelope {
    let (name, arguments) = match parse_tool_call(params) {
        Ok(call) => call,
        Err(err) => return app_error_to_json_rpc(id, err),
    };

    debug!(tool = %name, "invoking tool");
    match state
        .registry
        .call(&state.tool_context, &name, arguments)
        .await
    {
        Ok(result) => json_rpc_result_from(id, &result),
        Err(err) => {
            warn!(tool = %name, error = %err, "tool call failed");
            app_error_to_json_rpc(id, err)
        }
    }
}

/// Extracts `params.name` and `params.arguments`; a missing or non-object `arguments`
/// becomes an empty object.
pub fn parse_tool_call(params: Option<Value>) -> Result<(String, Map<String, Value>), AppError> {
    let mut params = match params {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    };

    let name = params
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::invalid_arguments("missing_tool_name", "tools/call params.name is required")
        })?;

    let arguments = match params.remove("arguments") {
        Some(Value::Object(arguments)) => arguments,
        _ => Map::new(),
    };

    Ok((name, arguments))
}
