//! Templates domain - hosted static site templates
//!
//! Responsibilities:
//! - Unpacking uploaded zip archives into object storage (`{slug}/{path}`)
//! - Resolving preview requests for published slugs
//! - Rewriting served HTML so relative links resolve on the slug's preview host

pub mod activities;
pub mod archive;
pub mod errors;
pub mod html;
pub mod models;

pub use activities::{ingest_archive, resolve_artifact, IngestOutcome, ResolvedArtifact};
pub use errors::{IngestError, ResolveError};
pub use models::Template;
