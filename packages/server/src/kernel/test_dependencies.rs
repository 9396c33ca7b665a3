// TestDependencies - in-memory implementations for testing
//
// Provides fake services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{
    BaseObjectStore, BasePublicationLookup, ServerDeps, DEFAULT_MAX_EXTRACTED_BYTES,
    DEFAULT_UPLOAD_CONCURRENCY,
};

pub const TEST_PREVIEW_DOMAIN: &str = "preview.agency.test";

// =============================================================================
// In-Memory Object Store
// =============================================================================

/// Arguments captured from a put call
#[derive(Debug, Clone)]
pub struct PutCall {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    put_calls: Mutex<Vec<PutCall>>,
    get_calls: Mutex<Vec<String>>,
    failing_keys: Mutex<HashSet<String>>,
    unavailable: Mutex<bool>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing put call recording
    pub fn with_object(self, key: &str, body: impl Into<Bytes>) -> Self {
        self.objects.lock().unwrap().insert(key.to_string(), body.into());
        self
    }

    /// Make writes to `key` fail
    pub fn failing_on(self, key: &str) -> Self {
        self.failing_keys.lock().unwrap().insert(key.to_string());
        self
    }

    /// Make every read and write fail as if the store were down
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn put_calls(&self) -> Vec<PutCall> {
        self.put_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().unwrap().clone()
    }

    fn is_unavailable(&self) -> bool {
        *self.unavailable.lock().unwrap()
    }
}

#[async_trait]
impl BaseObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.put_calls.lock().unwrap().push(PutCall {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: body.len(),
        });

        if self.is_unavailable() {
            return Err(anyhow!("object store unavailable"));
        }
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(anyhow!("simulated write failure for {}", key));
        }

        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.get_calls.lock().unwrap().push(key.to_string());

        if self.is_unavailable() {
            return Err(anyhow!("object store unavailable"));
        }
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://objects/{}", key)
    }
}

// =============================================================================
// Mock Publication Lookup
// =============================================================================

#[derive(Default)]
pub struct MockPublicationLookup {
    published: Mutex<HashSet<String>>,
    failing: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockPublicationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_published(self, slug: &str) -> Self {
        self.publish(slug);
        self
    }

    pub fn publish(&self, slug: &str) {
        self.published.lock().unwrap().insert(slug.to_string());
    }

    pub fn unpublish(&self, slug: &str) {
        self.published.lock().unwrap().remove(slug);
    }

    /// Make lookups fail as if the database were down
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePublicationLookup for MockPublicationLookup {
    async fn is_published(&self, slug: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(slug.to_string());

        if *self.failing.lock().unwrap() {
            return Err(anyhow!("publication lookup unavailable"));
        }
        Ok(self.published.lock().unwrap().contains(slug))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub object_store: Arc<InMemoryObjectStore>,
    pub publications: Arc<MockPublicationLookup>,
    pub preview_domain: String,
    pub upload_concurrency: usize,
    pub max_extracted_bytes: u64,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            object_store: Arc::new(InMemoryObjectStore::new()),
            publications: Arc::new(MockPublicationLookup::new()),
            preview_domain: TEST_PREVIEW_DOMAIN.to_string(),
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
        }
    }

    /// Set an object store
    pub fn object_store(mut self, store: InMemoryObjectStore) -> Self {
        self.object_store = Arc::new(store);
        self
    }

    /// Set a publication lookup
    pub fn publications(mut self, lookup: MockPublicationLookup) -> Self {
        self.publications = Arc::new(lookup);
        self
    }

    pub fn preview_domain(mut self, domain: &str) -> Self {
        self.preview_domain = domain.to_string();
        self
    }

    pub fn upload_concurrency(mut self, concurrency: usize) -> Self {
        self.upload_concurrency = concurrency;
        self
    }

    pub fn max_extracted_bytes(mut self, limit: u64) -> Self {
        self.max_extracted_bytes = limit;
        self
    }

    /// Build ServerDeps sharing these fakes, so tests can inspect them afterwards
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.object_store.clone(),
            self.publications.clone(),
            self.preview_domain.clone(),
            self.upload_concurrency,
        )
        .with_max_extracted_bytes(self.max_extracted_bytes)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
