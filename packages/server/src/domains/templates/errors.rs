use thiserror::Error;

use crate::common::SlugError;

/// Ingest failures that reject the whole upload.
///
/// Per-entry write failures are not errors; they are reported in
/// [`IngestOutcome::failed_paths`](super::activities::IngestOutcome).
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    #[error("Invalid archive: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),

    #[error("Archive expands to more than {limit} bytes")]
    ArchiveTooLarge { limit: u64 },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Resolve failures. Everything except `Unavailable` is a not-found.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Template \"{slug}\" is not published (or does not exist). Publish it from the dashboard to enable previews.")]
    NotPublished { slug: String },

    #[error("File \"{path}\" was not found in template \"{slug}\". Check that it was included in the uploaded archive.")]
    ObjectMissing { slug: String, path: String },

    #[error("File \"{path}\" in template \"{slug}\" is not valid UTF-8 and cannot be served as HTML")]
    Undecodable { slug: String, path: String },

    #[error("Storage unavailable while resolving \"{path}\" in template \"{slug}\": {source}")]
    Unavailable {
        slug: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ResolveError::Unavailable { .. })
    }
}
