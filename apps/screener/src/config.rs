use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding vectorizer.json, classifier.json, labels.json, skills.json.
    pub model_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Per-document upload limit; larger files are treated as unextractable.
    pub max_upload_bytes: usize,
    /// Whole-request body limit for multipart screenings.
    pub max_request_bytes: usize,
    pub extraction_timeout: Duration,
    pub default_min_score: f64,
    pub default_top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model_dir: PathBuf::from("models"),
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            max_request_bytes: 50 * 1024 * 1024,
            extraction_timeout: Duration::from_secs(20),
            default_min_score: 30.0,
            default_top_k: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            model_dir: std::env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_request_bytes: parse_env("MAX_REQUEST_BYTES", defaults.max_request_bytes)?,
            extraction_timeout: Duration::from_secs(parse_env(
                "EXTRACTION_TIMEOUT_SECS",
                defaults.extraction_timeout.as_secs(),
            )?),
            default_min_score: parse_env("DEFAULT_MIN_SCORE", defaults.default_min_score)?,
            default_top_k: parse_env("DEFAULT_TOP_K", defaults.default_top_k)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u16 = parse_env("SCREENER_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("SCREENER_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("SCREENER_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("SCREENER_TEST_MIN_SCORE", " 45.5 ");
        let value: f64 = parse_env("SCREENER_TEST_MIN_SCORE", 30.0).unwrap();
        assert_eq!(value, 45.5);
        std::env::remove_var("SCREENER_TEST_MIN_SCORE");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_min_score, 30.0);
        assert_eq!(config.default_top_k, 10);
        assert_eq!(config.model_dir, PathBuf::from("models"));
    }
}
