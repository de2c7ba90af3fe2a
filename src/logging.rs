use std::time::Instant;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Dropped,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Dropped => "dropped",
        }
    }
}

/// Stdout carries protocol envelopes, so all log output goes to stderr.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn log_request_summary(method: &str, outcome: Outcome, started_at: Instant) {
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        outcome = outcome.as_str(),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if outcome == Outcome::Dropped {
        debug!(method = %method, "no response emitted for notification");
    }
}
