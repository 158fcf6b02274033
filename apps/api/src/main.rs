use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use interview_api::config::Config;
use interview_api::llm_client::{LanguageModel, LlmClient};
use interview_api::log_inspect::remove_expired_logs;
use interview_api::logging;
use interview_api::routes::build_router;
use interview_api::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    logging::init(&config.log_dir, &config.rust_log)?;

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    match remove_expired_logs(&config.log_dir, config.log_retention_days, Local::now()) {
        Ok(removed) if !removed.is_empty() => {
            info!("Removed {} expired log file(s)", removed.len())
        }
        Ok(_) => {}
        Err(e) => warn!("Log cleanup failed: {e:?}"),
    }

    let llm: Arc<dyn LanguageModel> = Arc::new(LlmClient::new(
        config.google_api_key.clone(),
        config.llm_model.clone(),
        config.llm_temperature,
    )?);
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        llm.model_name(),
        config.llm_temperature
    );

    if let Some(dir) = &config.report_dir {
        info!("Completed interview reports will be exported to {}", dir.display());
    }

    let state = AppState::new(llm, config.clone());

    let max_idle = Duration::from_secs(config.session_idle_mins.saturating_mul(60));
    state.sessions.spawn_idle_sweeper(max_idle, SESSION_SWEEP_INTERVAL);
    info!(
        "Idle interview sessions are evicted after {} minute(s)",
        config.session_idle_mins
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
