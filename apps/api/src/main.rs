mod config;
mod db;
mod errors;
mod extraction;
mod interview;
mod llm_client;
mod matching;
mod models;
mod notifications;
mod pipeline;
mod routes;
mod state;
mod stores;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::extractor::LlmRequirementExtractor;
use crate::interview::scheduling::HttpSchedulingService;
use crate::llm_client::LlmClient;
use crate::matching::scoring::KeywordMatchScorer;
use crate::pipeline::session::{spawn_idle_sweeper, SessionDeps, SessionRegistry};
use crate::routes::build_router;
use crate::state::AppState;
use crate::stores::{PgCandidateStore, PgJobStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matchboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (candidate pool + job store)
    let db = create_pool(&config.database_url).await?;

    // Initialize generative client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let scheduler = HttpSchedulingService::new(config.scheduling_service_url.clone())?;
    info!(
        "Scheduling service client initialized ({})",
        config.scheduling_service_url
    );

    // Collaborators shared by every session. Swap implementations here.
    let deps = SessionDeps {
        extractor: Arc::new(LlmRequirementExtractor::new(Arc::new(llm))),
        candidates: Arc::new(PgCandidateStore::new(db.clone())),
        jobs: Arc::new(PgJobStore::new(db)),
        scorer: Arc::new(KeywordMatchScorer::default()),
        scheduler: Arc::new(scheduler),
    };

    let sessions = Arc::new(SessionRegistry::with_limit(config.max_sessions));
    spawn_idle_sweeper(sessions.clone(), config.session_idle_ttl);
    info!(
        "Session sweeper started (idle TTL {:?}, limit {})",
        config.session_idle_ttl, config.max_sessions
    );

    let state = AppState::new(deps, sessions);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins to the frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
