use anyhow::{Context, Result};

use crate::extract::DelimiterPair;

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub artifact_start_marker: String,
    pub artifact_end_marker: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            artifact_start_marker: std::env::var("ARTIFACT_START_MARKER")
                .unwrap_or_else(|_| "[RESUME_START]".to_string()),
            artifact_end_marker: std::env::var("ARTIFACT_END_MARKER")
                .unwrap_or_else(|_| "[RESUME_END]".to_string()),
        })
    }

    /// Validated delimiter pair built from the configured markers.
    pub fn delimiter_pair(&self) -> Result<DelimiterPair> {
        DelimiterPair::new(
            self.artifact_start_marker.clone(),
            self.artifact_end_marker.clone(),
        )
        .context("ARTIFACT_START_MARKER / ARTIFACT_END_MARKER are not a valid delimiter pair")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
