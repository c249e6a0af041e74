use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recruiting REST backend, e.g. `http://localhost:3000/api`.
    pub backend_url: String,
    /// Client-side timeout for backend calls. `None` leaves reqwest's default (no timeout).
    pub backend_timeout: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: require_env("BACKEND_URL")?
                .trim_end_matches('/')
                .to_string(),
            backend_timeout: parse_timeout(std::env::var("BACKEND_TIMEOUT_SECS").ok())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(secs) => {
            let secs = secs
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?;
            Ok(Some(Duration::from_secs(secs)))
        }
    }
}
