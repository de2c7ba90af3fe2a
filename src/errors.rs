use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid arguments: {message}")]
    InvalidArguments { code: &'static str, message: String },
    #[error("precondition violated: {message}")]
    PreconditionViolated { code: &'static str, message: String },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("unknown tool: {name}")]
    ToolNotFound { name: String },
    #[error("{context}: {message}")]
    Io { context: String, message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn invalid_arguments(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            code,
            message: message.into(),
        }
    }

    pub fn precondition(code: &'static str, message: impl Into<String>) -> Self {
        Self::PreconditionViolated {
            code,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, carried in the JSON-RPC `error.data` object.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments { code, .. } | Self::PreconditionViolated { code, .. } => *code,
            Self::Configuration { .. } => "project_root_unresolved",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::Io { .. } => "io_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn details(&self) -> Value {
        match self {
            Self::ToolNotFound { name } => json!({ "name": name }),
            _ => json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn display_carries_message_text() {
        let err = AppError::precondition("anchor_not_found", "anchor '--x' not found in a.lua");
        assert_eq!(
            err.to_string(),
            "precondition violated: anchor '--x' not found in a.lua"
        );
        assert_eq!(err.code(), "anchor_not_found");
    }

    #[test]
    fn tool_not_found_details_name_the_tool() {
        let err = AppError::tool_not_found("missing_tool");
        assert_eq!(err.code(), "tool_not_found");
        assert_eq!(err.details()["name"], "missing_tool");
    }
}
