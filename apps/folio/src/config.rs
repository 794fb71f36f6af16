use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the content base URL is required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL the localized documents are fetched from.
    pub content_base_url: String,
    /// Secondary base URL for deployments where base paths differ
    /// (e.g. project pages served under a sub-path). Defaults to the primary.
    pub content_alt_base_url: Option<String>,
    pub default_lang: String,
    pub default_theme: String,
    /// Directory holding the preferences file.
    pub storage_dir: PathBuf,
    /// Directory export artifacts are written to.
    pub output_dir: PathBuf,
    pub export_template: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            content_base_url: require_env("CONTENT_BASE_URL")?,
            content_alt_base_url: std::env::var("CONTENT_ALT_BASE_URL").ok(),
            default_lang: env_or("DEFAULT_LANG", "es"),
            default_theme: env_or("DEFAULT_THEME", "classic"),
            storage_dir: std::env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_storage_dir()),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "exports")),
            export_template: env_or("EXPORT_TEMPLATE", "professional"),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
