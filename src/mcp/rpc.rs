//! JSON-RPC envelope codec
//!
//! Decodes request lines into [`RequestEnvelope`] and encodes [`ResponseEnvelope`] values as
//! compact single-line JSON with null members removed.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::errors::AppError;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("Parse error: request must be a JSON object")]
    NotAnObject,
}

/// A decoded request. `id` is absent for notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub id: Option<Value>,
    pub method: Option<String>,
    pub params: Option<Value>,
}

impl RequestEnvelope {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

impl ResponseEnvelope {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ResponseOutcome::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            ResponseOutcome::Result(value) => Some(value),
            ResponseOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        match &self.outcome {
            ResponseOutcome::Error(error) => Some(error),
            ResponseOutcome::Result(_) => None,
        }
    }
}

pub fn decode_request(line: &str) -> Result<RequestEnvelope, ParseError> {
    let value: Value = serde_json::from_str(line)?;
    let Value::Object(mut object) = value else {
        return Err(ParseError::NotAnObject);
    };

    Ok(RequestEnvelope {
        id: object.remove("id").filter(|id| !id.is_null()),
        method: object
            .remove("method")
            .and_then(|method| method.as_str().map(str::to_string)),
        params: object.remove("params").filter(|params| !params.is_null()),
    })
}

pub fn encode_response(response: &ResponseEnvelope) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(response)?;
    serde_json::to_string(&strip_nulls(value))
}

pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, item)| !item.is_null())
                .map(|(key, item)| (key, strip_nulls(item)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> ResponseEnvelope {
    ResponseEnvelope {
        jsonrpc: JSONRPC_VERSION,
        id,
        outcome: ResponseOutcome::Result(result),
    }
}

/// Serializes a schema payload into a result envelope.
pub fn json_rpc_result_from<T: Serialize>(id: Option<Value>, payload: &T) -> ResponseEnvelope {
    match serde_json::to_value(payload) {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(
            id,
            AppError::internal(format!("result serialization failed: {err}")),
        ),
    }
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> ResponseEnvelope {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> ResponseEnvelope {
    ResponseEnvelope {
        jsonrpc: JSONRPC_VERSION,
        id,
        outcome: ResponseOutcome::Error(ErrorObject {
            code,
            message: message.to_string(),
            data,
        }),
    }
}

/// Every tool-level failure shares one JSON-RPC code; causes are told apart by the
/// message text and `data.code`.
pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> ResponseEnvelope {
    let message = err.to_string();
    json_rpc_error_with_data(
        id,
        INTERNAL_ERROR,
        &message,
        Some(json!({
            "code": err.code(),
            "message": message,
            "details": err.details(),
        })),
    )
}
