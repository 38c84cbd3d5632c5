use std::time::Duration;

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};

use crate::llm_client::{RetryMode, RetryPolicy};

/// Minimum length of `SESSION_SECRET`; the cookie key is derived from it.
const MIN_SESSION_SECRET_LEN: usize = 32;
/// Upper bound for `LLM_MAX_ATTEMPTS`.
const MAX_LLM_ATTEMPTS: u32 = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub google_api_key: SecretString,
    pub session_secret: SecretString,
    pub port: u16,
    pub rust_log: String,
    pub llm_max_attempts: u32,
    pub llm_attempt_timeout_secs: u64,
    pub llm_retry_mode: RetryMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_secret = SecretString::from(require_env("SESSION_SECRET")?);
        if session_secret.expose_secret().len() < MIN_SESSION_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes long");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            google_api_key: SecretString::from(require_env("GOOGLE_API_KEY")?),
            session_secret,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            llm_max_attempts: parse_max_attempts(&optional_env("LLM_MAX_ATTEMPTS", "3"))?,
            llm_attempt_timeout_secs: optional_env("LLM_ATTEMPT_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("LLM_ATTEMPT_TIMEOUT_SECS must be a number of seconds")?,
            llm_retry_mode: parse_retry_mode(&optional_env("LLM_RETRY_MODE", "first_success"))?,
        })
    }

    /// Retry policy applied to every AI call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.llm_max_attempts,
            mode: self.llm_retry_mode,
            attempt_timeout: Duration::from_secs(self.llm_attempt_timeout_secs),
            ..RetryPolicy::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_max_attempts(value: &str) -> Result<u32> {
    let attempts = value
        .trim()
        .parse::<u32>()
        .context("LLM_MAX_ATTEMPTS must be a positive integer")?;
    if !(1..=MAX_LLM_ATTEMPTS).contains(&attempts) {
        bail!("LLM_MAX_ATTEMPTS must be between 1 and {MAX_LLM_ATTEMPTS}, got {attempts}");
    }
    Ok(attempts)
}

fn parse_retry_mode(value: &str) -> Result<RetryMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "first_success" => Ok(RetryMode::FirstSuccess),
        "last_attempt" => Ok(RetryMode::LastAttempt),
        other => bail!("LLM_RETRY_MODE must be 'first_success' or 'last_attempt', got '{other}'"),
    }
}
