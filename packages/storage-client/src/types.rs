use serde::Deserialize;
use std::time::Duration;

/// Connection settings for a storage bucket.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Storage REST root, e.g. `https://project.example.co/storage/v1`
    pub base_url: String,
    /// Service-role key sent as a bearer token
    pub service_key: String,
    pub bucket: String,
    pub timeout: Duration,
}

impl StorageOptions {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            bucket: bucket.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body returned by a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "Key")]
    pub key: Option<String>,
}

/// Error body returned by the storage API.
///
/// `statusCode` arrives as a string, and missing objects are reported
/// with HTTP 400 and a `"404"` code on some deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn is_not_found(&self) -> bool {
        self.status_code.as_deref() == Some("404")
            || self
                .error
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case("not_found"))
    }
}
