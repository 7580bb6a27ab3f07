use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    /// Base URL of the interview scheduling service. Requests are POSTed to `{url}/interviews`.
    pub scheduling_service_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            scheduling_service_url: require_env("SCHEDULING_SERVICE_URL")?
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_idle_ttl: Duration::from_secs(
                std::env::var("SESSION_IDLE_TTL_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
            max_sessions: std::env::var("MAX_SESSIONS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<usize>()
                .context("MAX_SESSIONS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
