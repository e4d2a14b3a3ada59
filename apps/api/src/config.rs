use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::customization::DEFAULT_HISTORY_LIMIT;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// When set, editor snapshots go to Redis instead of `store_dir`.
    pub redis_url: Option<String>,
    pub store_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub editor: EditorConfig,
}

/// Tunables handed to every editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub history_limit: usize,
    pub customization_debounce: Duration,
    pub sections_debounce: Duration,
    pub draft_debounce: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            customization_debounce: Duration::from_millis(500),
            sections_debounce: Duration::from_millis(1000),
            draft_debounce: Duration::from_millis(2000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EditorConfig::default();
        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            store_dir: std::env::var("STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/store")),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            editor: EditorConfig {
                history_limit: parse_env("HISTORY_LIMIT", defaults.history_limit)?,
                customization_debounce: millis_env(
                    "CUSTOMIZATION_DEBOUNCE_MS",
                    defaults.customization_debounce,
                )?,
                sections_debounce: millis_env("SECTIONS_DEBOUNCE_MS", defaults.sections_debounce)?,
                draft_debounce: millis_env("DRAFT_DEBOUNCE_MS", defaults.draft_debounce)?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn millis_env(key: &str, default: Duration) -> Result<Duration> {
    let ms = parse_env(key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}
