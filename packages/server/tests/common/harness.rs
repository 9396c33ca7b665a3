//! Test harness wiring the router to in-memory dependencies.
//!
//! No containers are needed: object storage and the publication lookup are
//! replaced by the fakes in `template_core::kernel::test_dependencies`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use bytes::Bytes;
use template_core::domains::auth::JwtService;
use template_core::kernel::TestDependencies;
use template_core::server::build_app;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-for-template-server";
pub const TEST_JWT_ISSUER: &str = "template-server-test";
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

const MULTIPART_BOUNDARY: &str = "template-test-boundary";

pub struct TestHarness {
    pub deps: TestDependencies,
    pub jwt_service: JwtService,
    pub app: Router,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_deps(TestDependencies::new())
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let app = build_app(
            deps.server_deps(),
            JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string()),
            &[],
            TEST_MAX_UPLOAD_BYTES,
        );

        Self {
            deps,
            jwt_service: JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string()),
            app,
        }
    }

    pub fn token_for_role(&self, role: &str) -> String {
        self.jwt_service
            .create_token(Uuid::new_v4(), format!("{}@agency.test", role), role)
            .expect("Failed to create token")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).expect("valid request"))
            .await
    }

    /// POST a multipart upload. `None` fields are omitted from the form.
    pub async fn upload(
        &self,
        token: Option<&str>,
        slug: Option<&str>,
        archive: Option<&Bytes>,
    ) -> Response<Body> {
        let mut builder = Request::post("/api/templates/upload").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = multipart_body(slug, archive);
        self.send(builder.body(Body::from(body)).expect("valid request"))
            .await
    }
}

fn multipart_body(slug: Option<&str>, archive: Option<&Bytes>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(slug) = slug {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"slug\"\r\n\r\n{slug}\r\n",
                b = MULTIPART_BOUNDARY
            )
            .as_bytes(),
        );
    }
    if let Some(archive) = archive {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"site.zip\"\r\nContent-Type: application/zip\r\n\r\n",
                b = MULTIPART_BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(archive);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}
