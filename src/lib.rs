use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod transport;

use config::ProjectRoot;
use domain::registry::{ToolContext, ToolRegistry};

/// Read-only state shared by every request for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub tool_context: ToolContext,
}

impl AppState {
    pub fn new(registry: ToolRegistry, project_root: ProjectRoot) -> Self {
        Self {
            registry: Arc::new(registry),
            tool_context: ToolContext::new(project_root),
        }
    }
}
