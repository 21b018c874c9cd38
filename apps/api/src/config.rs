use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Offset, Utc};

/// Which record store implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Remote,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "remote" => Ok(StoreBackend::Remote),
            other => bail!("STORE_BACKEND must be 'memory' or 'remote', got '{other}'"),
        }
    }
}

/// Credentials and endpoint for the hosted record store.
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub timeout_secs: u64,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the selected backend is missing required variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub remote_store: Option<RemoteStoreConfig>,
    pub simulated_latency_ms: u64,
    /// Offset used to place reminder timestamps on calendar days.
    pub calendar_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend: StoreBackend = optional_env("STORE_BACKEND", "memory").parse()?;

        let remote_store = match store_backend {
            StoreBackend::Memory => None,
            StoreBackend::Remote => Some(RemoteStoreConfig {
                base_url: require_env("RECORD_STORE_URL")?,
                project_id: require_env("RECORD_STORE_PROJECT_ID")?,
                public_key: require_env("RECORD_STORE_PUBLIC_KEY")?,
                timeout_secs: optional_env("RECORD_STORE_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("RECORD_STORE_TIMEOUT_SECS must be a whole number of seconds")?,
            }),
        };

        Ok(Config {
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            store_backend,
            remote_store,
            simulated_latency_ms: optional_env("SIMULATED_LATENCY_MS", "0")
                .parse::<u64>()
                .context("SIMULATED_LATENCY_MS must be a whole number of milliseconds")?,
            calendar_offset: parse_offset(&optional_env("CALENDAR_UTC_OFFSET_MINUTES", "0"))?,
        })
    }

    /// In-memory configuration used by tests and local development.
    pub fn in_memory() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            store_backend: StoreBackend::Memory,
            remote_store: None,
            simulated_latency_ms: 0,
            calendar_offset: Utc.fix(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Minutes east of UTC, e.g. `-300` for UTC-5.
fn parse_offset(raw: &str) -> Result<FixedOffset> {
    let minutes = raw
        .trim()
        .parse::<i32>()
        .context("CALENDAR_UTC_OFFSET_MINUTES must be an integer")?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("CALENDAR_UTC_OFFSET_MINUTES out of range: {minutes}"))
}
