//! Template archive ingestion.
//!
//! Unpacks an uploaded zip into the object store under `{slug}/{path}`.
//! Writes are upserts and independent of each other; a failed write is
//! reported and skipped, never fatal. There is no rollback, re-uploading a
//! corrected archive is the recovery path.

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::common::{content_type_for_path, Slug};
use crate::domains::templates::archive::{plan_objects, read_archive};
use crate::domains::templates::errors::IngestError;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedEntry {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub canonical_slug: String,
    pub stored_count: usize,
    /// Stored paths relative to the slug, in archive order
    pub stored_paths: Vec<String>,
    pub failed_paths: Vec<FailedEntry>,
}

impl IngestOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed_paths.is_empty()
    }
}

/// Ingest a zip archive as the artifact set for `slug_input`.
pub async fn ingest_archive(
    slug_input: &str,
    archive: Bytes,
    deps: &ServerDeps,
) -> Result<IngestOutcome, IngestError> {
    let slug = Slug::from_input(slug_input)?;
    let archive_size = archive.len();

    // Decompression is CPU-bound; keep it off the async workers
    let max_extracted_bytes = deps.max_extracted_bytes;
    let entries = tokio::task::spawn_blocking(move || read_archive(&archive, max_extracted_bytes))
        .await
        .map_err(|e| IngestError::Internal(anyhow::anyhow!("archive reader panicked: {}", e)))??;

    let (root, planned) = plan_objects(entries);

    info!(
        slug = %slug,
        archive_bytes = archive_size,
        document_root = %root,
        entries = planned.len(),
        "Ingesting template archive"
    );

    if planned.is_empty() {
        warn!(slug = %slug, "Archive contained no admitted files; nothing stored");
    }

    let store = deps.object_store.clone();
    let results: Vec<(String, anyhow::Result<()>)> = stream::iter(planned)
        .map(|object| {
            let store = store.clone();
            let key = slug.object_key(&object.path);
            async move {
                let content_type = content_type_for_path(&object.path);
                let result = store
                    .put(&key, Bytes::from(object.data), &content_type)
                    .await;
                (object.path, result)
            }
        })
        .buffered(deps.upload_concurrency.max(1))
        .collect()
        .await;

    let mut stored_paths = Vec::with_capacity(results.len());
    let mut failed_paths = Vec::new();
    for (path, result) in results {
        match result {
            Ok(()) => stored_paths.push(path),
            Err(e) => {
                warn!(slug = %slug, path = %path, error = %e, "Failed to store template file");
                failed_paths.push(FailedEntry {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    info!(
        slug = %slug,
        stored = stored_paths.len(),
        failed = failed_paths.len(),
        "Template archive ingested"
    );

    Ok(IngestOutcome {
        canonical_slug: slug.to_string(),
        stored_count: stored_paths.len(),
        stored_paths,
        failed_paths,
    })
}
