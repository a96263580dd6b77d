mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::interview::orchestrator::Interviewer;
use crate::interview::rounds::RoundTable;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Round table: built once, shared read-only
    let rounds = match &config.rounds_config {
        Some(path) => RoundTable::from_json_file(path)?,
        None => RoundTable::reference(),
    };
    info!(
        "Round table loaded: {}",
        rounds
            .rounds()
            .iter()
            .map(|r| format!("{}:{}@{}", r.ordinal, r.name, r.pass_threshold))
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Initialize completion gateway
    let llm = LlmClient::new(&config)?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s, rubric: {:?})",
        llm.model(),
        config.llm_timeout_secs,
        config.rubric
    );

    let interviewer = Interviewer::new(Arc::new(llm), Arc::new(rounds), config.rubric);

    // Build app state
    let state = AppState {
        interviewer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
