use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_RETENTION_DAYS: i64 = 7;
pub const DEFAULT_SESSION_IDLE_MINS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub port: u16,
    pub rust_log: String,
    pub log_dir: PathBuf,
    pub log_retention_days: i64,
    /// Sessions with no event for this long are evicted from the store.
    pub session_idle_mins: u64,
    /// When set, completed interview reports are also written here.
    pub report_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_temperature: parse_env("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)
                .context("LLM_TEMPERATURE must be a number")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_dir: log_dir_from_env(),
            log_retention_days: at_least_one(
                "LOG_RETENTION_DAYS",
                parse_env("LOG_RETENTION_DAYS", DEFAULT_LOG_RETENTION_DAYS)
                    .context("LOG_RETENTION_DAYS must be a whole number of days")?,
            )?,
            session_idle_mins: at_least_one(
                "SESSION_IDLE_MINS",
                parse_env("SESSION_IDLE_MINS", DEFAULT_SESSION_IDLE_MINS)
                    .context("SESSION_IDLE_MINS must be a whole number of minutes")?,
            )?,
            report_dir: std::env::var("REPORT_DIR").ok().map(PathBuf::from),
        })
    }
}

/// `LOG_DIR` or the default `logs` directory. Shared with the log inspection binary.
pub fn log_dir_from_env() -> PathBuf {
    std::env::var("LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn at_least_one<T>(key: &str, value: T) -> Result<T>
where
    T: PartialOrd + From<u8> + std::fmt::Display,
{
    if value < T::from(1) {
        anyhow::bail!("{key} must be at least 1, got {value}");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}
