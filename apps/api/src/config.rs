use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_CHAT_CONTEXT_PAIRS: usize = 20;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Startup fails if `GOOGLE_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on a resume upload request body.
    pub max_upload_bytes: usize,
    /// How many of the most recent chat exchanges are replayed to the model.
    /// `None` replays the whole history.
    pub chat_context_pairs: Option<usize>,
    pub llm_timeout_secs: u64,
    /// Sessions idle this long are dropped. `None` keeps them until deleted.
    pub session_idle_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chat_context_pairs = parse_env("CHAT_CONTEXT_PAIRS", DEFAULT_CHAT_CONTEXT_PAIRS)?;
        let session_idle_secs = parse_env("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?;

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            chat_context_pairs: (chat_context_pairs > 0).then_some(chat_context_pairs),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?,
            session_idle_secs: (session_idle_secs > 0).then_some(session_idle_secs),
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
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}
