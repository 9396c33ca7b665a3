//! Extension-based content rules for template files.
//!
//! Everything here is a table lookup on the lowercased file extension.
//! File contents are never inspected.

/// Extensions admitted into storage from an uploaded archive.
pub const ADMITTED_EXTENSIONS: &[&str] = &[
    // markup
    "html", "htm", "xml", "txt",
    // styles and scripts
    "css", "js", "mjs", "json", "map",
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
];

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Served for HTML documents, which are likely to be replaced by a redeploy.
pub const HTML_CACHE_CONTROL: &str = "public, max-age=60";

/// Served for every other asset.
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Lowercased extension of the last path segment, if it has one.
pub fn file_extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() && ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether an archive entry at `path` may be stored.
pub fn is_admitted(path: &str) -> bool {
    file_extension(path).is_some_and(|ext| ADMITTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `path` names an HTML document (`.html` / `.htm`).
pub fn is_html_path(path: &str) -> bool {
    matches!(file_extension(path).as_deref(), Some("html" | "htm"))
}

/// Content type for a stored path.
///
/// Admitted extensions resolve through a fixed table; anything else found in
/// the bucket falls back to `mime_guess`, then to `application/octet-stream`.
pub fn content_type_for_path(path: &str) -> String {
    let Some(ext) = file_extension(path) else {
        return OCTET_STREAM.to_string();
    };

    let known = match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        _ => {
            return mime_guess::from_ext(&ext)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        }
    };
    known.to_string()
}

/// Cache directive for a served path.
pub fn cache_control_for_path(path: &str) -> &'static str {
    if is_html_path(path) {
        HTML_CACHE_CONTROL
    } else {
        ASSET_CACHE_CONTROL
    }
}
