//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the dependency container used by the template
//! activities. All external services use trait abstractions to enable testing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use sqlx::PgPool;
use std::sync::Arc;
use storage_client::StorageClient;
use tracing::debug;

use crate::domains::templates::models::Template;
use crate::kernel::{BaseObjectStore, BasePublicationLookup};

/// Default number of object writes in flight during one ingest.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Default cap on the decompressed size of one uploaded archive (256 MiB).
pub const DEFAULT_MAX_EXTRACTED_BYTES: u64 = 256 * 1024 * 1024;

// =============================================================================
// StorageClient Adapter (implements BaseObjectStore trait)
// =============================================================================

/// Wrapper around StorageClient that implements BaseObjectStore trait
pub struct StorageAdapter(pub Arc<StorageClient>);

impl StorageAdapter {
    pub fn new(client: Arc<StorageClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseObjectStore for StorageAdapter {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        let uploaded = self
            .0
            .upload(key, body, content_type)
            .await
            .with_context(|| failure_context("upload", key))?;
        debug!(key, stored_as = ?uploaded.key, "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.0
            .download(key)
            .await
            .map_err(|e| {
                let action = if e.is_timeout() { "download (timed out)" } else { "download" };
                anyhow::Error::new(e).context(failure_context(action, key))
            })
    }

    fn public_url(&self, key: &str) -> String {
        self.0.public_url(key)
    }
}

fn failure_context(action: &str, key: &str) -> String {
    format!("{} of {} failed", action, key)
}

// =============================================================================
// Postgres Publication Lookup (implements BasePublicationLookup trait)
// =============================================================================

pub struct PgPublicationLookup {
    pool: PgPool,
}

impl PgPublicationLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BasePublicationLookup for PgPublicationLookup {
    async fn is_published(&self, slug: &str) -> Result<bool> {
        let template = Template::find_by_slug(slug, &self.pool).await?;
        Ok(template.is_some_and(|t| t.is_published))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub object_store: Arc<dyn BaseObjectStore>,
    pub publications: Arc<dyn BasePublicationLookup>,
    /// Suffix of the per-slug preview host, without leading dot
    pub preview_domain: String,
    /// Maximum object writes in flight per ingest (at least 1)
    pub upload_concurrency: usize,
    /// Decompressed bytes one archive may expand to
    pub max_extracted_bytes: u64,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        object_store: Arc<dyn BaseObjectStore>,
        publications: Arc<dyn BasePublicationLookup>,
        preview_domain: impl Into<String>,
        upload_concurrency: usize,
    ) -> Self {
        Self {
            object_store,
            publications,
            preview_domain: preview_domain.into(),
            upload_concurrency: upload_concurrency.max(1),
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
        }
    }

    pub fn with_max_extracted_bytes(mut self, max_extracted_bytes: u64) -> Self {
        self.max_extracted_bytes = max_extracted_bytes;
        self
    }

    /// Base URL of a slug's preview virtual host, with trailing slash
    pub fn preview_base_url(&self, slug: &str) -> String {
        format!("https://{}.{}/", slug, self.preview_domain)
    }

    /// Recognize `{slug}.{preview_domain}` (port and case ignored) and return the slug label
    pub fn preview_slug_for_host(&self, host: &str) -> Option<String> {
        let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
        let label = host
            .strip_suffix(self.preview_domain.as_str())?
            .strip_suffix('.')?;
        if label.is_empty() || label.contains('.') {
            return None;
        }
        Some(label.to_string())
    }
}
