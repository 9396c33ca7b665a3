use sha2::{Digest, Sha256};

/// Generate a strong ETag for a response body
///
/// The tag is the quoted SHA256 hex digest of the exact bytes served, so a
/// rewritten HTML document gets a different tag than the stored original.
pub fn generate_etag(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("\"{:x}\"", hasher.finalize())
}

/// Check an `If-None-Match` header value against a current ETag
///
/// Accepts `*`, comma-separated lists, and weak validators (`W/"..."`).
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate == etag || candidate.strip_prefix("W/") == Some(etag)
    })
}
