pub mod ingest;
pub mod resolve;

pub use ingest::{ingest_archive, FailedEntry, IngestOutcome};
pub use resolve::{resolve_artifact, site_path, ResolvedArtifact};
