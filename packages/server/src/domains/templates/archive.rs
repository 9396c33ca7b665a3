//! Template archive handling.
//!
//! Turns an uploaded zip into the list of files to store for a slug:
//!
//! 1. Entry names are normalized (`\` becomes `/`, empty and `.` segments are
//!    dropped). Names containing `..` are rejected outright.
//! 2. Only entries whose extension is on the allow-list are read.
//! 3. The document root is detected once for the whole archive and stripped
//!    from every admitted path.
//!
//! Root detection prefers the directory holding an `index.html`/`index.htm`.
//! When several exist the shallowest wins; at equal depth `index.html` beats
//! `index.htm`, then the lexicographically smaller directory wins, so the
//! result does not depend on the order a zip tool wrote entries in. Without
//! any index file the first segment of the first admitted nested entry is
//! used, which covers archives wrapped in `dist/` or `build/`.

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::common::is_admitted;
use crate::domains::templates::errors::IngestError;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// One admitted file read from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Normalized path inside the archive
    pub path: String,
    pub data: Vec<u8>,
}

/// A file ready to be written under `{slug}/{path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedObject {
    /// Path relative to the document root
    pub path: String,
    pub data: Vec<u8>,
}

/// Read every admitted file entry from a zip archive.
///
/// Entries are filtered by name before their data is touched, so directory
/// entries, non-admitted extensions, and unsafe names are skipped even when
/// `zip` could not open them (encrypted, unsupported compression). An
/// admitted entry that cannot be opened or decompressed is skipped with a
/// warning. The call fails only for an unreadable container, or when the
/// admitted entries together decompress past `max_extracted_bytes`.
pub fn read_archive(bytes: &[u8], max_extracted_bytes: u64) -> Result<Vec<ArchiveEntry>, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();
    let mut remaining = max_extracted_bytes;

    for index in 0..archive.len() {
        let Some(raw_name) = archive.name_for_index(index).map(str::to_string) else {
            continue;
        };
        if raw_name.ends_with('/') || raw_name.ends_with('\\') {
            continue;
        }

        let Some(path) = normalize_entry_path(&raw_name) else {
            warn!(entry = %raw_name, "Skipping archive entry with unsafe path");
            continue;
        };
        if !is_admitted(&path) {
            debug!(entry = %path, "Skipping archive entry with disallowed extension");
            continue;
        }

        let file = match archive.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                warn!(entry = %path, error = %e, "Skipping archive entry that cannot be opened");
                continue;
            }
        };

        // Header sizes are untrusted; read at most one byte past the budget
        let mut data = Vec::new();
        if let Err(e) = file.take(remaining.saturating_add(1)).read_to_end(&mut data) {
            warn!(entry = %path, error = %e, "Skipping unreadable archive entry");
            continue;
        }
        let read = data.len() as u64;
        if read > remaining {
            warn!(entry = %path, limit = max_extracted_bytes, "Archive exceeds extraction limit");
            return Err(IngestError::ArchiveTooLarge {
                limit: max_extracted_bytes,
            });
        }
        remaining -= read;

        entries.push(ArchiveEntry { path, data });
    }

    Ok(entries)
}

/// Normalize an archive entry name to `/`-separated relative form.
///
/// Returns `None` for names that are empty after normalization or that try
/// to walk up with `..`.
pub fn normalize_entry_path(raw: &str) -> Option<String> {
    let unified = raw.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Detect the document root prefix (no trailing slash, empty for top level).
pub fn detect_document_root<S: AsRef<str>>(paths: &[S]) -> String {
    let best_index = paths
        .iter()
        .filter_map(|p| index_candidate(p.as_ref()))
        .min_by(|a, b| {
            a.depth
                .cmp(&b.depth)
                .then(a.rank.cmp(&b.rank))
                .then(a.dir.cmp(b.dir))
        });

    if let Some(candidate) = best_index {
        return candidate.dir.to_string();
    }

    paths
        .first()
        .and_then(|p| p.as_ref().split_once('/'))
        .map(|(first, _)| first.to_string())
        .unwrap_or_default()
}

/// Strip the document root from a normalized path.
///
/// Returns `None` for paths outside the root, and for results that are empty
/// or start with `/`.
pub fn strip_document_root(path: &str, root: &str) -> Option<String> {
    let stripped = if root.is_empty() {
        path
    } else {
        path.strip_prefix(root)?.strip_prefix('/')?
    };
    if stripped.is_empty() || stripped.starts_with('/') {
        return None;
    }
    Some(stripped.to_string())
}

/// Compute the objects to store for a set of admitted entries.
///
/// Order follows the archive. Entries outside the detected root are dropped.
pub fn plan_objects(entries: Vec<ArchiveEntry>) -> (String, Vec<PlannedObject>) {
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    let root = detect_document_root(&paths);

    let planned = entries
        .into_iter()
        .filter_map(|entry| match strip_document_root(&entry.path, &root) {
            Some(path) => Some(PlannedObject {
                path,
                data: entry.data,
            }),
            None => {
                debug!(entry = %entry.path, root = %root, "Skipping entry outside document root");
                None
            }
        })
        .collect();

    (root, planned)
}

struct IndexCandidate<'a> {
    dir: &'a str,
    depth: usize,
    rank: usize,
}

fn index_candidate(path: &str) -> Option<IndexCandidate<'_>> {
    let (dir, file_name) = match path.rsplit_once('/') {
        Some((dir, file_name)) => (dir, file_name),
        None => ("", path),
    };
    let rank = INDEX_FILES.iter().position(|name| *name == file_name)?;
    let depth = if dir.is_empty() {
        0
    } else {
        dir.split('/').count()
    };
    Some(IndexCandidate { dir, depth, rank })
}
