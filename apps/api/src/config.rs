use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::budget::DEFAULT_LINE_BUDGET;
use crate::layout::page_limit::DEFAULT_MAX_PAGES;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Generation endpoints answer 503 when unset.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Default line budget for PDF rendering when a request gives none.
    pub line_budget: usize,
    /// Page limit applied to generated CV text.
    pub max_pages: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            line_budget: parse_env("LINE_BUDGET", DEFAULT_LINE_BUDGET)?,
            max_pages: parse_env("MAX_PAGES", DEFAULT_MAX_PAGES)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            line_budget: DEFAULT_LINE_BUDGET,
            max_pages: DEFAULT_MAX_PAGES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Set and non-blank, trimmed.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        assert_eq!(parse_env("CVFORGE_TEST_UNSET", 42usize).unwrap(), 42);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("CVFORGE_TEST_BUDGET", " 120 ");
        assert_eq!(parse_env("CVFORGE_TEST_BUDGET", 100usize).unwrap(), 120);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("CVFORGE_TEST_PORT", "eighty");
        let err = parse_env("CVFORGE_TEST_PORT", 8080u16).unwrap_err();
        assert!(err.to_string().contains("CVFORGE_TEST_PORT"));
    }

    #[test]
    fn test_blank_optional_env_is_none() {
        std::env::set_var("CVFORGE_TEST_KEY", "   ");
        assert_eq!(optional_env("CVFORGE_TEST_KEY"), None);
    }
}
