//! Argument decoding and normalization shared by the bundled tools

use std::{
    path::{Component, Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::AppError;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"))
}

fn namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("namespace regex")
    })
}

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("literal regex"))
}

pub fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Map<String, Value>,
) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|err| {
        AppError::invalid_arguments("invalid_arguments", format!("{tool}: {err}"))
    })
}

pub fn require_non_empty(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_arguments(
            "missing_argument",
            format!("{field} must not be empty"),
        ));
    }

    Ok(trimmed.to_string())
}

/// Keys that end up inside generated Lua/C# identifiers.
pub fn normalize_identifier(field: &str, value: &str) -> Result<String, AppError> {
    let value = require_non_empty(field, value)?;
    if !identifier_pattern().is_match(&value) {
        return Err(AppError::invalid_arguments(
            "invalid_identifier",
            format!(
                "{field} must start with a letter or underscore and contain only \
                 letters, digits and underscores"
            ),
        ));
    }

    Ok(value)
}

/// Values that end up inside generated Lua string literals.
pub fn normalize_literal(field: &str, value: &str) -> Result<String, AppError> {
    let value = require_non_empty(field, value)?;
    if !literal_pattern().is_match(&value) {
        return Err(AppError::invalid_arguments(
            "invalid_literal",
            format!("{field} must contain only letters, digits, dots, dashes, and underscores"),
        ));
    }

    Ok(value)
}

pub fn normalize_namespace(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if !namespace_pattern().is_match(value) {
        return Err(AppError::invalid_arguments(
            "invalid_namespace",
            "namespace must be a dot-separated list of identifiers",
        ));
    }

    Ok(Some(value.to_string()))
}

/// A bare file stem; a trailing `extension` is dropped.
pub fn normalize_file_stem(field: &str, value: &str, extension: &str) -> Result<String, AppError> {
    let value = require_non_empty(field, value)?;
    let stem = value
        .strip_suffix(&format!(".{extension}"))
        .unwrap_or(&value)
        .trim();

    if stem.is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\'])
        || stem.chars().any(char::is_control)
    {
        return Err(AppError::invalid_arguments(
            "invalid_file_name",
            format!("{field} must be a plain file name without directories"),
        ));
    }

    Ok(stem.to_string())
}

/// A relative path that stays inside its base directory.
pub fn normalize_relative_path(field: &str, value: &str) -> Result<PathBuf, AppError> {
    let value = require_non_empty(field, value)?;
    let path = Path::new(&value);

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AppError::invalid_arguments(
                    "invalid_path",
                    format!("{field} must be relative and must not contain '..'"),
                ))
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(AppError::invalid_arguments(
            "invalid_path",
            format!("{field} must name a file"),
        ));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Args {
        #[serde(rename = "scriptName")]
        script_name: String,
    }

    #[test]
    fn parse_arguments_reports_missing_field() {
        let arguments = json!({}).as_object().cloned().expect("object");
        let err = parse_arguments::<Args>("create_lua_script", arguments).expect_err("missing");
        assert_eq!(err.code(), "invalid_arguments");
        assert!(err.to_string().contains("scriptName"));
    }

    #[test]
    fn parse_arguments_reads_renamed_field() {
        let arguments = json!({"scriptName": "Foo"})
            .as_object()
            .cloned()
            .expect("object");
        let args = parse_arguments::<Args>("create_lua_script", arguments).expect("args");
        assert_eq!(args.script_name, "Foo");
    }

    #[test]
    fn blank_values_are_rejected() {
        let err = require_non_empty("activityKey", "   ").expect_err("blank");
        assert_eq!(err.code(), "missing_argument");
    }

    #[test]
    fn identifiers_reject_spaces_and_quotes() {
        assert_eq!(
            normalize_identifier("activityKey", " Summer2026 ").expect("valid"),
            "Summer2026"
        );
        assert!(normalize_identifier("activityKey", "Summer Sale").is_err());
        assert!(normalize_identifier("activityKey", "9Lives").is_err());
        assert!(normalize_literal("rewardType", "a\"b").is_err());
        assert!(normalize_literal("rewardType", "Reward.Type-1").is_ok());
    }

    #[test]
    fn namespace_is_optional_and_dotted() {
        assert_eq!(normalize_namespace(None).expect("none"), None);
        assert_eq!(normalize_namespace(Some("  ")).expect("blank"), None);
        assert_eq!(
            normalize_namespace(Some("Game.UI")).expect("dotted"),
            Some("Game.UI".to_string())
        );
        assert!(normalize_namespace(Some("Game..UI")).is_err());
    }

    #[test]
    fn file_stem_strips_extension_and_rejects_directories() {
        assert_eq!(
            normalize_file_stem("scriptName", "Foo.lua", "lua").expect("stem"),
            "Foo"
        );
        assert!(normalize_file_stem("scriptName", "../Foo", "lua").is_err());
        assert!(normalize_file_stem("scriptName", ".lua", "lua").is_err());
    }

    #[test]
    fn relative_path_cannot_escape_base() {
        assert_eq!(
            normalize_relative_path("luaScriptPath", "./Resources/Lua/a.lua").expect("relative"),
            PathBuf::from("Resources/Lua/a.lua")
        );
        assert!(normalize_relative_path("luaScriptPath", "../secrets.lua").is_err());
        assert!(normalize_relative_path("luaScriptPath", "/etc/passwd").is_err());
        assert!(normalize_relative_path("luaScriptPath", ".").is_err());
    }
}
