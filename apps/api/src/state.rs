use crate::config::Config;
use crate::interview::orchestrator::Interviewer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; concurrent interviews share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Owns the completion gateway and the round table.
    pub interviewer: Interviewer,
    pub config: Config,
}
