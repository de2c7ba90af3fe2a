//! Unity project tools exposed via Model Context Protocol
//!
//! Two tools scaffold new Lua / C# sources, two splice generated Lua into existing files
//! next to anchor comments. [`build_registry`] is the single place a tool is registered.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use rust_mcp_sdk::{
    macros,
    schema::{CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::domain::{
    anchor::{apply_patch, prepare_patch, AnchorPatch, Placement},
    registry::{ToolContext, ToolHandler, ToolRegistry},
    templates::{self, ScriptKind, RETRO_CLAIM_ANCHOR},
    utils::{
        normalize_file_stem, normalize_identifier, normalize_literal, normalize_namespace,
        normalize_relative_path, parse_arguments,
    },
};
use crate::errors::AppError;

pub const ASSETS_DIR: &str = "Assets";
pub const LUA_SCRIPTS_DIR: [&str; 2] = ["Resources", "Lua"];
pub const CSHARP_SCRIPTS_DIR: &str = "Scripts";
pub const CSHARP_EDITOR_DIR: &str = "Editor";
pub const POPUP_CONFIG_DIR: [&str; 3] = ["HotAssets", "LuaScript", "Config"];
pub const POPUP_SEQ_CONFIG_FILE: &str = "PopupSeqConfig.lua";
pub const POPUP_FUN_CONFIG_FILE: &str = "PopupFunConfig.lua";
pub const POPUP_SEQ_ANCHOR: &str = "        --淘汰赛补领";
pub const POPUP_FUN_ANCHOR: &str = "-- 淘汰赛补领弹窗";

#[macros::mcp_tool(
    name = "create_lua_script",
    description = "Create a Unity Lua script under Assets/Resources/Lua containing the retro claim anchor"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateLuaScriptArgs {
    /// Script name without the .lua extension
    #[serde(rename = "scriptName")]
    pub script_name: String,
}

#[macros::mcp_tool(
    name = "create_csharp_script",
    description = "Create a Unity C# script (MonoBehaviour, ScriptableObject or Editor)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCsharpScriptArgs {
    /// Class and file name of the script
    #[serde(rename = "scriptName")]
    pub script_name: String,
    /// One of MonoBehaviour, ScriptableObject, Editor (default MonoBehaviour)
    #[serde(rename = "scriptType")]
    pub script_type: Option<String>,
    /// Optional namespace wrapping the class
    pub namespace: Option<String>,
}

#[macros::mcp_tool(
    name = "add_activity_retro_claim",
    description = "Register a generic activity reward retro claim popup in PopupSeqConfig.lua and PopupFunConfig.lua"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AddActivityRetroClaimArgs {
    /// Activity key, e.g. MyNewActivity
    #[serde(rename = "activityKey")]
    pub activity_key: String,
    /// Reward type, e.g. MyNewActivityRewardType
    #[serde(rename = "rewardType")]
    pub reward_type: String,
    /// Localization key, e.g. MyNewActivity
    #[serde(rename = "multipleLanguageKey")]
    pub multiple_language_key: String,
}

#[macros::mcp_tool(
    name = "add_retro_claim_function",
    description = "Insert an activity retro claim function after the retro claim anchor of a Lua script"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AddRetroClaimFunctionArgs {
    /// Lua script path relative to the Assets directory, e.g. Resources/Lua/activity.lua
    #[serde(rename = "luaScriptPath")]
    pub lua_script_path: String,
    /// Unique activity key
    #[serde(rename = "activityKey")]
    pub activity_key: String,
}

pub fn build_registry() -> ToolRegistry {
    let handlers: Vec<Arc<dyn ToolHandler>> = vec![
        Arc::new(CreateLuaScriptTool),
        Arc::new(CreateCsharpScriptTool),
        Arc::new(AddActivityRetroClaimTool),
        Arc::new(AddRetroClaimFunctionTool),
    ];
    ToolRegistry::new(handlers)
}

fn text_result(text: String, structured: Map<String, Value>) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: Some(structured),
    }
}

fn assets_path(root: &Path) -> PathBuf {
    root.join(ASSETS_DIR)
}

async fn write_source(
    directory: &Path,
    file_name: &str,
    content: &str,
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|err| AppError::io(format!("failed to create {}", directory.display()), err))?;

    let path = directory.join(file_name);
    tokio::fs::write(&path, content)
        .await
        .map_err(|err| AppError::io(format!("failed to write {}", path.display()), err))?;
    Ok(path)
}

pub struct CreateLuaScriptTool;

#[async_trait]
impl ToolHandler for CreateLuaScriptTool {
    fn descriptor(&self) -> Tool {
        CreateLuaScriptArgs::tool()
    }

    async fn execute(
        &self,
        context: &ToolContext,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError> {
        let args: CreateLuaScriptArgs = parse_arguments("create_lua_script", arguments)?;
        let script_name = normalize_file_stem("scriptName", &args.script_name, "lua")?;

        let mut directory = assets_path(context.project_root()?);
        directory.extend(LUA_SCRIPTS_DIR);
        let path = write_source(
            &directory,
            &format!("{script_name}.lua"),
            &templates::lua_script(&script_name),
        )
        .await?;

        info!(path = %path.display(), "lua script created");
        Ok(text_result(
            format!("Created Lua script: {}", path.display()),
            Map::from_iter([("path".to_string(), json!(path.display().to_string()))]),
        ))
    }
}

pub struct CreateCsharpScriptTool;

#[async_trait]
impl ToolHandler for CreateCsharpScriptTool {
    fn descriptor(&self) -> Tool {
        CreateCsharpScriptArgs::tool()
    }

    async fn execute(
        &self,
        context: &ToolContext,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError> {
        let args: CreateCsharpScriptArgs = parse_arguments("create_csharp_script", arguments)?;
        let script_name = normalize_identifier("scriptName", &args.script_name)?;
        let kind = match args
            .script_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            None => ScriptKind::MonoBehaviour,
            Some(value) => ScriptKind::parse(value).ok_or_else(|| {
                AppError::invalid_arguments(
                    "invalid_script_type",
                    format!(
                        "unsupported scriptType '{value}', expected one of: {}",
                        ScriptKind::NAMES.join(", ")
                    ),
                )
            })?,
        };
        let namespace = normalize_namespace(args.namespace.as_deref())?;

        let directory = assets_path(context.project_root()?).join(match kind {
            ScriptKind::Editor => CSHARP_EDITOR_DIR,
            ScriptKind::MonoBehaviour | ScriptKind::ScriptableObject => CSHARP_SCRIPTS_DIR,
        });
        let path = write_source(
            &directory,
            &format!("{script_name}.cs"),
            &templates::csharp_script(&script_name, kind, namespace.as_deref()),
        )
        .await?;

        info!(path = %path.display(), kind = ?kind, "csharp script created");
        Ok(text_result(
            format!("Created C# script: {}", path.display()),
            Map::from_iter([("path".to_string(), json!(path.display().to_string()))]),
        ))
    }
}

pub struct AddActivityRetroClaimTool;

#[async_trait]
impl ToolHandler for AddActivityRetroClaimTool {
    fn descriptor(&self) -> Tool {
        AddActivityRetroClaimArgs::tool()
    }

    async fn execute(
        &self,
        context: &ToolContext,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError> {
        let args: AddActivityRetroClaimArgs =
            parse_arguments("add_activity_retro_claim", arguments)?;
        let activity_key = normalize_identifier("activityKey", &args.activity_key)?;
        let reward_type = normalize_literal("rewardType", &args.reward_type)?;
        let language_key = normalize_literal("multipleLanguageKey", &args.multiple_language_key)?;

        let mut config_dir = assets_path(context.project_root()?);
        config_dir.extend(POPUP_CONFIG_DIR);
        let seq_path = config_dir.join(POPUP_SEQ_CONFIG_FILE);
        let fun_path = config_dir.join(POPUP_FUN_CONFIG_FILE);

        let seq_block = templates::popup_seq_config_entry(&activity_key);
        let fun_block =
            templates::popup_fun_config_entries(&activity_key, &reward_type, &language_key);

        // Both files are validated before either is written.
        let seq_patch = prepare_patch(&AnchorPatch {
            path: &seq_path,
            anchor: POPUP_SEQ_ANCHOR,
            block: &seq_block,
            placement: Placement::Before,
        })
        .await?;
        let fun_patch = prepare_patch(&AnchorPatch {
            path: &fun_path,
            anchor: POPUP_FUN_ANCHOR,
            block: &fun_block,
            placement: Placement::Before,
        })
        .await?;

        let seq_written = seq_patch.commit().await?;
        let fun_written = fun_patch.commit().await?;

        info!(activity_key = %activity_key, "activity retro claim registered");
        Ok(text_result(
            format!("Added retro claim popup for activity '{activity_key}'."),
            Map::from_iter([(
                "files".to_string(),
                json!([
                    seq_written.display().to_string(),
                    fun_written.display().to_string()
                ]),
            )]),
        ))
    }
}

pub struct AddRetroClaimFunctionTool;

#[async_trait]
impl ToolHandler for AddRetroClaimFunctionTool {
    fn descriptor(&self) -> Tool {
        AddRetroClaimFunctionArgs::tool()
    }

    async fn execute(
        &self,
        context: &ToolContext,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError> {
        let args: AddRetroClaimFunctionArgs =
            parse_arguments("add_retro_claim_function", arguments)?;
        let relative = normalize_relative_path("luaScriptPath", &args.lua_script_path)?;
        let activity_key = normalize_identifier("activityKey", &args.activity_key)?;

        let path = assets_path(context.project_root()?).join(&relative);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                return Err(AppError::precondition(
                    "file_not_found",
                    format!("Lua script is not a file: {}", path.display()),
                ))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(AppError::precondition(
                    "file_not_found",
                    format!("Lua script does not exist: {}", path.display()),
                ))
            }
            Err(err) => {
                return Err(AppError::io(
                    format!("failed to inspect {}", path.display()),
                    err,
                ))
            }
        }

        let block = templates::retro_claim_function(&activity_key);
        let written = apply_patch(&AnchorPatch {
            path: &path,
            anchor: RETRO_CLAIM_ANCHOR,
            block: &block,
            placement: Placement::After,
        })
        .await?;

        info!(
            path = %written.display(),
            activity_key = %activity_key,
            "retro claim function inserted"
        );
        Ok(text_result(
            format!(
                "Added retro claim function for activity '{activity_key}' to {}",
                relative.display()
            ),
            Map::from_iter([("path".to_string(), json!(written.display().to_string()))]),
        ))
    }
}
