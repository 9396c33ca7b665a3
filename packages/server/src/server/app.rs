//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, IF_NONE_MATCH},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::{jwt_auth_middleware, preview_host_middleware};
use crate::server::routes::{
    health_handler, preview_path_handler, preview_root_handler, upload_template_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // No configured origins: allow any origin (development)
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, IF_NONE_MATCH])
}

/// Build the Axum application router
///
/// `max_upload_bytes` caps the multipart body of the upload route only;
/// preview routes keep axum's default limit.
pub fn build_app(
    deps: ServerDeps,
    jwt_service: JwtService,
    allowed_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    let deps = Arc::new(deps);
    let jwt_service = Arc::new(jwt_service);

    let app_state = AppState {
        deps: deps.clone(),
        jwt_service: jwt_service.clone(),
    };

    let upload_routes = Router::new()
        .route("/api/templates/upload", post(upload_template_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/health", get(health_handler))
        .route("/preview/:slug", get(preview_root_handler))
        .route("/preview/:slug/", get(preview_root_handler))
        .route("/preview/:slug/*path", get(preview_path_handler))
        .merge(upload_routes)
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        })) // JWT authentication
        .layer(middleware::from_fn(move |req, next| {
            preview_host_middleware(deps.clone(), req, next)
        })) // Preview subdomains short-circuit the API router
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
