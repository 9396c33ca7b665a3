//! Template upload endpoint.
//!
//! POST /api/templates/upload (multipart: `slug`, `file`)
//!
//! Requires an authenticated admin or operator. Responds with the ingest
//! outcome as JSON; a partially stored archive is still a 200, with the
//! failed entries listed in `failedPaths`.

use axum::{
    extract::{multipart::MultipartError, Extension, Multipart},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info};

use crate::domains::templates::{ingest_archive, IngestError, IngestOutcome};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    let status = match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    api_error(status, format!("Malformed upload: {}", e.body_text()))
}

pub async fn upload_template_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, ApiError> {
    let Some(Extension(user)) = auth_user else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Authentication required"));
    };
    if !user.is_elevated() {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "Admin or operator role required",
        ));
    }

    let mut slug: Option<String> = None;
    let mut archive: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("slug") => slug = Some(field.text().await.map_err(multipart_error)?),
            Some("file") => archive = Some(field.bytes().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let slug = slug
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'slug' field"))?;
    let archive = archive
        .filter(|a| !a.is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'file' field"))?;

    info!(
        user_id = %user.user_id,
        slug_input = %slug,
        archive_bytes = archive.len(),
        "Template upload received"
    );

    match ingest_archive(&slug, archive, &state.deps).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e @ (IngestError::InvalidSlug(_) | IngestError::InvalidArchive(_))) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e @ IngestError::ArchiveTooLarge { .. }) => {
            Err(api_error(StatusCode::PAYLOAD_TOO_LARGE, e.to_string()))
        }
        Err(e) => {
            error!(slug_input = %slug, error = %e, "Template upload failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Template upload failed",
            ))
        }
    }
}
