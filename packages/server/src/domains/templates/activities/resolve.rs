//! Preview artifact resolution.
//!
//! Maps `(slug, path segments)` to a stored object. Read-only: safe to run
//! concurrently with an ingest of the same slug, which may leave a mix of old
//! and new files visible until it finishes.

use bytes::Bytes;
use tracing::debug;

use crate::common::{cache_control_for_path, content_type_for_path, is_html_path, Slug};
use crate::domains::templates::errors::ResolveError;
use crate::domains::templates::html::inject_base_href;
use crate::kernel::ServerDeps;

pub const DEFAULT_DOCUMENT: &str = "index.html";
const FALLBACK_DOCUMENT: &str = "index.htm";

#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: &'static str,
    /// Path actually served, after index fallback
    pub path: String,
}

/// Join request segments into an in-site path.
///
/// No segments means the site root. A trailing empty segment (`about/`)
/// means that directory's index. Returns `None` for `.`/`..` segments or
/// segments containing a separator.
pub fn site_path<S: AsRef<str>>(segments: &[S]) -> Option<String> {
    let is_directory = segments.last().is_some_and(|s| s.as_ref().is_empty());
    let mut parts = Vec::with_capacity(segments.len() + 1);

    for segment in segments.iter().map(AsRef::as_ref) {
        match segment {
            "" => continue,
            "." | ".." => return None,
            s if s.contains('/') || s.contains('\\') => return None,
            s => parts.push(s),
        }
    }

    if parts.is_empty() || is_directory {
        parts.push(DEFAULT_DOCUMENT);
    }
    Some(parts.join("/"))
}

/// The `.htm` sibling tried when an `index.html` is missing.
fn index_fallback(path: &str) -> Option<String> {
    if path == DEFAULT_DOCUMENT || path.ends_with("/index.html") {
        let dir = &path[..path.len() - DEFAULT_DOCUMENT.len()];
        return Some(format!("{}{}", dir, FALLBACK_DOCUMENT));
    }
    None
}

/// Resolve a preview request to a servable artifact.
pub async fn resolve_artifact<S: AsRef<str>>(
    slug: &str,
    segments: &[S],
    deps: &ServerDeps,
) -> Result<ResolvedArtifact, ResolveError> {
    let requested = site_path(segments);
    let display_path = requested
        .clone()
        .unwrap_or_else(|| segments.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("/"));

    let not_published = || ResolveError::NotPublished {
        slug: slug.to_string(),
    };

    let slug = Slug::parse_canonical(slug).map_err(|_| not_published())?;
    let published = deps
        .publications
        .is_published(slug.as_str())
        .await
        .map_err(|source| ResolveError::Unavailable {
            slug: slug.to_string(),
            path: display_path.clone(),
            source,
        })?;
    if !published {
        debug!(slug = %slug, "Preview requested for unpublished template");
        return Err(not_published());
    }

    let missing = || ResolveError::ObjectMissing {
        slug: slug.to_string(),
        path: display_path.clone(),
    };
    let path = requested.ok_or_else(missing)?;

    let (path, body) = match read(&slug, &path, deps).await? {
        Some(body) => (path, body),
        None => {
            let fallback = index_fallback(&path).ok_or_else(missing)?;
            debug!(slug = %slug, path = %path, fallback = %fallback, "Trying index fallback");
            let body = read(&slug, &fallback, deps).await?.ok_or_else(missing)?;
            (fallback, body)
        }
    };

    let content_type = content_type_for_path(&path);
    let cache_control = cache_control_for_path(&path);

    let body = if is_html_path(&path) {
        let document = std::str::from_utf8(&body).map_err(|_| ResolveError::Undecodable {
            slug: slug.to_string(),
            path: path.clone(),
        })?;
        let base_href = deps.preview_base_url(slug.as_str());
        Bytes::from(inject_base_href(document, &base_href))
    } else {
        body
    };

    Ok(ResolvedArtifact {
        body,
        content_type,
        cache_control,
        path,
    })
}

async fn read(slug: &Slug, path: &str, deps: &ServerDeps) -> Result<Option<Bytes>, ResolveError> {
    deps.object_store
        .get(&slug.object_key(path))
        .await
        .map_err(|source| ResolveError::Unavailable {
            slug: slug.to_string(),
            path: path.to_string(),
            source,
        })
}
