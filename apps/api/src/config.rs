use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Where analysis results and their index records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3-compatible object storage plus a PostgreSQL index table.
    Remote,
    /// Process-local maps. Nothing survives a restart.
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "memory" => Ok(Self::Memory),
            other => bail!("STORAGE_BACKEND must be 'remote' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Only required for [`StorageBackend::Remote`].
    pub database_url: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub llm_timeout: Duration,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend = StorageBackend::parse(&env_or("STORAGE_BACKEND", "remote"))?;
        let database_url = match storage_backend {
            StorageBackend::Remote => Some(require_env("DATABASE_URL")?),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            storage_backend,
            database_url,
            s3_bucket: env_or("S3_BUCKET", "career-copilot-bucket"),
            s3_endpoint: env_or("S3_ENDPOINT", "http://localhost:4566"),
            aws_region: env_or("AWS_REGION", "us-east-1"),
            aws_access_key_id: env_or("AWS_ACCESS_KEY_ID", "test"),
            aws_secret_access_key: env_or("AWS_SECRET_ACCESS_KEY", "test"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434/api/generate"),
            ollama_model: env_or("OLLAMA_MODEL", "phi3:mini"),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 90)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
