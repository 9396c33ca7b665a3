//! Template preview endpoints.
//!
//! GET /preview/:slug          site root
//! GET /preview/:slug/*path    any file in the site
//!
//! Responses carry Content-Type, Cache-Control and a strong ETag; a matching
//! If-None-Match yields 304. Not-published and missing-file 404s use
//! different messages. Storage outages are 503.

use axum::{
    extract::{Extension, Path},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH, RETRY_AFTER},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::common::utils::{etag_matches, generate_etag};
use crate::domains::templates::resolve_artifact;
use crate::kernel::ServerDeps;
use crate::server::app::AppState;

pub async fn preview_root_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let segments: [&str; 0] = [];
    serve_artifact(&state.deps, &slug, &segments, &headers).await
}

pub async fn preview_path_handler(
    Extension(state): Extension<AppState>,
    Path((slug, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    serve_artifact(&state.deps, &slug, &segments, &headers).await
}

/// Resolve and render one preview response.
pub async fn serve_artifact<S: AsRef<str> + Sync>(
    deps: &ServerDeps,
    slug: &str,
    segments: &[S],
    headers: &HeaderMap,
) -> Response {
    match resolve_artifact(slug, segments, deps).await {
        Ok(artifact) => {
            let etag = generate_etag(&artifact.body);
            let not_modified = headers
                .get(IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| etag_matches(v, &etag));

            if not_modified {
                return (
                    StatusCode::NOT_MODIFIED,
                    [
                        (ETAG, etag),
                        (CACHE_CONTROL, artifact.cache_control.to_string()),
                    ],
                )
                    .into_response();
            }

            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, artifact.content_type),
                    (CACHE_CONTROL, artifact.cache_control.to_string()),
                    (ETAG, etag),
                ],
                artifact.body,
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => {
            debug!(slug, error = %e, "Preview not found");
            (
                StatusCode::NOT_FOUND,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.to_string(),
            )
                .into_response()
        }
        Err(e) => {
            error!(slug, error = %e, "Preview storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [
                    (CONTENT_TYPE, "text/plain; charset=utf-8"),
                    (RETRY_AFTER, "5"),
                ],
                "Template storage is temporarily unavailable. Please retry shortly.",
            )
                .into_response()
        }
    }
}
