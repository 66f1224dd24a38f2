use anyhow::{anyhow, Context, Result};

use crate::markup::GrammarKind;
use crate::render::EmphasisPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
///
/// Read once at startup, not per request: changing `BULLET_SRC` or any other
/// value takes a restart.
///
/// Canvas geometry and layout factors are compile-time constants
/// (`layout::default_layout_config`), not configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream JSON feed with a `bullets` string array.
    pub bullet_src: String,
    pub markup_grammar: GrammarKind,
    pub emphasis: EmphasisPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            bullet_src: require_env("BULLET_SRC")?,
            markup_grammar: parse_env("MARKUP_GRAMMAR", "markdown")?,
            emphasis: parse_env("EMPHASIS_STYLE", "weight")?,
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

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>().map_err(|e| anyhow!("{key}: {e}"))
}
