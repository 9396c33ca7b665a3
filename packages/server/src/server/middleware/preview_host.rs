//! Host-based preview routing.
//!
//! Requests addressed to `{slug}.{preview_domain}` bypass the API router and
//! are answered by the artifact resolver, using the request path as the
//! in-site path. This is the host the injected `<base href>` points at.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::HOST, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::kernel::ServerDeps;
use crate::server::routes::serve_artifact;

pub async fn preview_host_middleware(
    deps: Arc<ServerDeps>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().host());

    let Some(slug) = host.and_then(|h| deps.preview_slug_for_host(h)) else {
        return next.run(request).await;
    };

    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let segments = path_segments(request.uri().path());
    serve_artifact(&deps, &slug, &segments, request.headers()).await
}

/// Split a raw request path into percent-decoded segments.
fn path_segments(path: &str) -> Vec<String> {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("/"), vec![""]);
        assert_eq!(path_segments("/css/app.css"), vec!["css", "app.css"]);
        assert_eq!(path_segments("/about/"), vec!["about", ""]);
        assert_eq!(path_segments("/img/my%20logo.png"), vec!["img", "my logo.png"]);
    }

    #[test]
    fn test_encoded_separator_stays_in_one_segment() {
        // Rejected later by site_path, never turned into a path separator
        assert_eq!(path_segments("/..%2Fother/index.html"), vec!["../other", "index.html"]);
    }
}
