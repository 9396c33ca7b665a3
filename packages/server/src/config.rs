use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::kernel::DEFAULT_MAX_EXTRACTED_BYTES;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub storage_url: String,
    pub storage_service_key: String,
    pub storage_bucket: String,
    pub storage_timeout_secs: u64,
    /// Suffix of the per-slug preview host, e.g. `preview.example.com`
    pub preview_domain: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub upload_concurrency: usize,
    /// Cap on the decompressed size of one uploaded archive
    pub max_extracted_bytes: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            storage_url: env::var("STORAGE_URL").context("STORAGE_URL must be set")?,
            storage_service_key: env::var("STORAGE_SERVICE_KEY")
                .context("STORAGE_SERVICE_KEY must be set")?,
            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "templates".to_string()),
            storage_timeout_secs: env::var("STORAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("STORAGE_TIMEOUT_SECS must be a valid number")?,
            preview_domain: env::var("PREVIEW_DOMAIN")
                .context("PREVIEW_DOMAIN must be set")?
                .trim_matches('.')
                .to_ascii_lowercase(),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "agency-site".to_string()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
            upload_concurrency: env::var("UPLOAD_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("UPLOAD_CONCURRENCY must be a valid number")?,
            max_extracted_bytes: env::var("MAX_EXTRACTED_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_EXTRACTED_BYTES.to_string())
                .parse()
                .context("MAX_EXTRACTED_BYTES must be a valid number")?,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
