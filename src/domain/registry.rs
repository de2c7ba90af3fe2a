//! Tool contract and the start-up populated tool registry

use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolResult, Tool};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{config::ProjectRoot, errors::AppError};

/// Per-invocation context handed to every tool.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub project_root: ProjectRoot,
}

impl ToolContext {
    pub fn new(project_root: ProjectRoot) -> Self {
        Self { project_root }
    }

    pub fn project_root(&self) -> Result<&Path, AppError> {
        self.project_root.path()
    }
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and input schema, as advertised by `tools/list`.
    fn descriptor(&self) -> Tool;

    async fn execute(
        &self,
        context: &ToolContext,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError>;
}

struct RegisteredTool {
    descriptor: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Immutable once built. Listing follows registration order; when two handlers share a
/// name the later one replaces the earlier in its original slot.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(handlers: Vec<Arc<dyn ToolHandler>>) -> Self {
        let mut tools: Vec<RegisteredTool> = Vec::with_capacity(handlers.len());
        let mut index = HashMap::with_capacity(handlers.len());

        for handler in handlers {
            let descriptor = handler.descriptor();
            let entry = RegisteredTool {
                descriptor,
                handler,
            };

            let existing = index.get(&entry.descriptor.name).copied();
            match existing {
                Some(slot) => {
                    warn!(
                        tool = %entry.descriptor.name,
                        "duplicate tool name, later registration wins"
                    );
                    tools[slot] = entry;
                }
                None => {
                    index.insert(entry.descriptor.name.clone(), tools.len());
                    tools.push(entry);
                }
            }
        }

        Self { tools, index }
    }

    pub fn names(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|entry| entry.descriptor.name.clone())
            .collect()
    }

    pub fn descriptors(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Runs the named tool on its own task so a panic inside it surfaces as an error
    /// instead of taking down the request loop.
    pub async fn call(
        &self,
        context: &ToolContext,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, AppError> {
        let Some(&slot) = self.index.get(name) else {
            return Err(AppError::tool_not_found(name));
        };

        let handler = Arc::clone(&self.tools[slot].handler);
        let context = context.clone();
        let task = tokio::spawn(async move { handler.execute(&context, arguments).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(AppError::internal(format!(
                "tool '{name}' terminated abnormally: {join_error}"
            ))),
        }
    }
}
