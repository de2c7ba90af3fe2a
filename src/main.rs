use unity_mcp_server::{
    config::{Config, ProjectRoot},
    domain::tools::build_registry,
    logging,
    transport::serve_stdio,
    AppState,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env();
    let project_root = config.resolve_project_root();
    match &project_root {
        ProjectRoot::Resolved(path) => {
            info!(project_root = %path.display(), "project root resolved")
        }
        ProjectRoot::Unresolved(err) => {
            warn!(error = %err, "project root unresolved, file tools will fail")
        }
    }

    let state = AppState::new(build_registry(), project_root);
    info!(
        tools = ?state.registry.names(),
        version = env!("CARGO_PKG_VERSION"),
        "server starting on stdio"
    );

    serve_stdio(&state).await?;
    Ok(())
}
