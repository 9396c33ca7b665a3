//! Artifact resolution tests, including the upload-then-preview flow.

mod common;

use crate::common::build_zip;
use bytes::Bytes;
use template_core::domains::templates::{ingest_archive, resolve_artifact, ResolveError};
use template_core::kernel::{InMemoryObjectStore, MockPublicationLookup, TestDependencies};

const NO_SEGMENTS: [&str; 0] = [];

fn published_deps(slug: &str, store: InMemoryObjectStore) -> TestDependencies {
    TestDependencies::new()
        .object_store(store)
        .publications(MockPublicationLookup::new().with_published(slug))
}

#[tokio::test]
async fn test_acme_site_end_to_end() {
    let deps = TestDependencies::new();
    let archive = build_zip(&[
        ("index.html", "<html><head></head><body>Acme</body></html>"),
        ("style.css", "h1 { color: red; }"),
    ]);

    let outcome = ingest_archive("Acme Site", archive, &deps.server_deps())
        .await
        .unwrap();
    assert_eq!(outcome.canonical_slug, "acme-site");
    assert_eq!(outcome.stored_count, 2);

    deps.publications.publish("acme-site");
    let server_deps = deps.server_deps();

    let page = resolve_artifact("acme-site", &NO_SEGMENTS, &server_deps)
        .await
        .unwrap();
    assert_eq!(page.content_type, "text/html");
    assert_eq!(
        std::str::from_utf8(&page.body).unwrap(),
        r#"<html><head><base href="https://acme-site.preview.agency.test/"></head><body>Acme</body></html>"#
    );

    let css = resolve_artifact("acme-site", &["style.css"], &server_deps)
        .await
        .unwrap();
    assert_eq!(css.content_type, "text/css");
    assert_eq!(css.body, Bytes::from("h1 { color: red; }"));
}

#[tokio::test]
async fn test_round_trip_preserves_bytes() {
    let deps = TestDependencies::new()
        .publications(MockPublicationLookup::new().with_published("demo"));
    let archive = build_zip(&[
        ("site/index.html", "<!doctype html><html><head><title>x</title></head></html>"),
        ("site/js/app.js", "console.log('hi');"),
        ("site/data/config.json", "{\"a\":1}"),
    ]);
    ingest_archive("demo", archive, &deps.server_deps()).await.unwrap();
    let server_deps = deps.server_deps();

    let js = resolve_artifact("demo", &["js", "app.js"], &server_deps).await.unwrap();
    assert_eq!(js.body, Bytes::from("console.log('hi');"));
    assert_eq!(js.content_type, "text/javascript");
    assert_eq!(js.cache_control, "public, max-age=3600");

    let json = resolve_artifact("demo", &["data", "config.json"], &server_deps).await.unwrap();
    assert_eq!(json.body, Bytes::from("{\"a\":1}"));

    let html = resolve_artifact("demo", &NO_SEGMENTS, &server_deps).await.unwrap();
    let text = std::str::from_utf8(&html.body).unwrap();
    assert_eq!(text.matches("<base href=").count(), 1);
    assert_eq!(html.cache_control, "public, max-age=60");
}

#[tokio::test]
async fn test_root_falls_back_to_index_htm() {
    let store = InMemoryObjectStore::new().with_object("legacy/index.htm", "<html><head></head></html>");
    let deps = published_deps("legacy", store);

    let page = resolve_artifact("legacy", &NO_SEGMENTS, &deps.server_deps())
        .await
        .unwrap();

    assert_eq!(page.path, "index.htm");
    assert_eq!(page.content_type, "text/html");
    assert_eq!(
        deps.object_store.get_calls(),
        vec!["legacy/index.html", "legacy/index.htm"]
    );
}

#[tokio::test]
async fn test_directory_request_serves_its_index() {
    let store = InMemoryObjectStore::new().with_object("demo/about/index.html", "<p>about</p>");
    let deps = published_deps("demo", store);

    let page = resolve_artifact("demo", &["about", ""], &deps.server_deps())
        .await
        .unwrap();

    assert_eq!(page.path, "about/index.html");
}

#[tokio::test]
async fn test_other_missing_paths_do_not_fall_back() {
    let store = InMemoryObjectStore::new().with_object("demo/index.html", "<html></html>");
    let deps = published_deps("demo", store);

    let err = resolve_artifact("demo", &["missing.css"], &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ObjectMissing { ref path, .. } if path == "missing.css"));
    assert_eq!(deps.object_store.get_calls(), vec!["demo/missing.css"]);
}

#[tokio::test]
async fn test_unpublished_slug_is_gated_even_when_objects_exist() {
    let deps = TestDependencies::new()
        .object_store(InMemoryObjectStore::new().with_object("draft/index.html", "<html></html>"));

    let err = resolve_artifact("draft", &NO_SEGMENTS, &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NotPublished { .. }));
    assert!(err.is_not_found());
    // The store is never consulted for unpublished slugs
    assert!(deps.object_store.get_calls().is_empty());
}

#[tokio::test]
async fn test_not_found_messages_are_distinguishable() {
    let deps = published_deps("demo", InMemoryObjectStore::new());
    let server_deps = deps.server_deps();

    let unpublished = resolve_artifact("other", &NO_SEGMENTS, &server_deps)
        .await
        .unwrap_err()
        .to_string();
    let missing = resolve_artifact("demo", &["gone.png"], &server_deps)
        .await
        .unwrap_err()
        .to_string();

    assert!(unpublished.contains("not published"));
    assert!(missing.contains("gone.png"));
    assert_ne!(unpublished, missing);
}

#[tokio::test]
async fn test_store_outage_is_transient_not_missing() {
    let deps = published_deps("demo", InMemoryObjectStore::new());
    deps.object_store.set_unavailable(true);

    let err = resolve_artifact("demo", &NO_SEGMENTS, &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Unavailable { .. }));
    assert!(!err.is_not_found());
    // A failed read is not a miss; no fallback attempted
    assert_eq!(deps.object_store.get_calls(), vec!["demo/index.html"]);
}

#[tokio::test]
async fn test_lookup_outage_is_transient() {
    let deps = published_deps("demo", InMemoryObjectStore::new());
    deps.publications.set_failing(true);

    let err = resolve_artifact("demo", &NO_SEGMENTS, &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Unavailable { .. }));
}

#[tokio::test]
async fn test_non_utf8_html_is_not_found() {
    let store = InMemoryObjectStore::new().with_object("demo/index.html", vec![0xffu8, 0xfe, 0x00]);
    let deps = published_deps("demo", store);

    let err = resolve_artifact("demo", &NO_SEGMENTS, &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Undecodable { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_traversal_segments_are_missing() {
    let deps = published_deps("demo", InMemoryObjectStore::new());

    let err = resolve_artifact("demo", &["..", "other", "index.html"], &deps.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ObjectMissing { .. }));
    assert!(deps.object_store.get_calls().is_empty());
}

#[tokio::test]
async fn test_unknown_extension_is_octet_stream() {
    let store = InMemoryObjectStore::new().with_object("demo/blob.bin", vec![1u8, 2, 3]);
    let deps = published_deps("demo", store);

    let artifact = resolve_artifact("demo", &["blob.bin"], &deps.server_deps())
        .await
        .unwrap();

    assert_eq!(artifact.content_type, "application/octet-stream");
    assert_eq!(artifact.body, Bytes::from(vec![1u8, 2, 3]));
}
