//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{
    PgPublicationLookup, ServerDeps, StorageAdapter, DEFAULT_MAX_EXTRACTED_BYTES,
    DEFAULT_UPLOAD_CONCURRENCY,
};
pub use test_dependencies::{InMemoryObjectStore, MockPublicationLookup, TestDependencies};
pub use traits::*;
