// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Ingest and resolve live in domains/templates and call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseObjectStore)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

// =============================================================================
// Object Store Trait (Infrastructure - keyed blob storage)
// =============================================================================

#[async_trait]
pub trait BaseObjectStore: Send + Sync {
    /// Write `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<()>;

    /// Read the object under `key`
    ///
    /// `Ok(None)` means the key does not exist. `Err` means the store could
    /// not answer (unavailable, timed out) and the caller may retry.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Public URL for an already-stored key
    fn public_url(&self, key: &str) -> String;
}

// =============================================================================
// Publication Lookup Trait (Infrastructure - template records)
// =============================================================================

#[async_trait]
pub trait BasePublicationLookup: Send + Sync {
    /// Whether a template record exists for `slug` and is marked published
    async fn is_published(&self, slug: &str) -> Result<bool>;
}
