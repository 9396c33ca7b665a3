//! Pure object storage REST API client.
//!
//! A minimal client for a bucket-addressed storage service. Supports
//! upserting objects, downloading them, and building public URLs.
//!
//! # Example
//!
//! ```rust,ignore
//! use storage_client::{StorageClient, StorageOptions};
//!
//! let options = StorageOptions::new("https://project.example.co/storage/v1", "service-key", "templates");
//! let client = StorageClient::new(options)?;
//!
//! client.upload("acme-site/index.html", body, "text/html").await?;
//! let bytes = client.download("acme-site/index.html").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, StorageError};
pub use types::{ApiErrorBody, StorageOptions, UploadResponse};

use bytes::Bytes;
use reqwest::StatusCode;

pub struct StorageClient {
    client: reqwest::Client,
    options: StorageOptions,
}

impl StorageClient {
    pub fn new(options: StorageOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client, options })
    }

    pub fn bucket(&self) -> &str {
        &self.options.bucket
    }

    /// Upload `body` under `key`, replacing any existing object.
    pub async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<UploadResponse> {
        let url = self.object_url(key);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Some deployments answer with an empty body.
        let uploaded = resp
            .json::<UploadResponse>()
            .await
            .unwrap_or(UploadResponse { key: None });
        tracing::debug!(key, bucket = %self.options.bucket, "Object uploaded");
        Ok(uploaded)
    }

    /// Download the object stored under `key`. Returns `None` when it does not exist.
    pub async fn download(&self, key: &str) -> Result<Option<Bytes>> {
        let url = self.object_url(key);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.options.service_key)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            if status == StatusCode::BAD_REQUEST && is_not_found_body(&message) {
                return Ok(None);
            }
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Some(resp.bytes().await?))
    }

    /// Public URL of an object in a public bucket. Does not check existence.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.base_url(),
            self.options.bucket,
            encode_key(key)
        )
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url(),
            self.options.bucket,
            encode_key(key)
        )
    }

    fn base_url(&self) -> &str {
        self.options.base_url.trim_end_matches('/')
    }
}

/// Percent-encode each key segment while keeping `/` separators.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_not_found_body(body: &str) -> bool {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.is_not_found())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(StorageOptions::new(
            "https://project.example.co/storage/v1/",
            "key",
            "templates",
        ))
        .unwrap()
    }

    #[test]
    fn test_encode_key_keeps_separators() {
        assert_eq!(encode_key("acme/css/app.css"), "acme/css/app.css");
        assert_eq!(encode_key("acme/my file.png"), "acme/my%20file.png");
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            client().public_url("acme/index.html"),
            "https://project.example.co/storage/v1/object/public/templates/acme/index.html"
        );
    }

    #[test]
    fn test_object_url_trims_trailing_slash() {
        assert_eq!(
            client().object_url("acme/a.js"),
            "https://project.example.co/storage/v1/object/templates/acme/a.js"
        );
    }

    #[test]
    fn test_not_found_body_detection() {
        assert!(is_not_found_body(
            r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#
        ));
        assert!(!is_not_found_body(
            r#"{"statusCode":"400","error":"InvalidKey","message":"bad key"}"#
        ));
        assert!(!is_not_found_body("gateway exploded"));
    }
}
