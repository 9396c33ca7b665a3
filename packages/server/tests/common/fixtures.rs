//! Test fixtures for building template archives.

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build an in-memory zip. Names ending in `/` become directory entries.
pub fn build_zip(entries: &[(&str, &str)]) -> Bytes {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("Failed to add directory entry");
        } else {
            writer
                .start_file(*name, options)
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
    }

    let cursor = writer.finish().expect("Failed to finish zip");
    Bytes::from(cursor.into_inner())
}

/// Build an in-memory zip whose `encrypted` entries use ZipCrypto, which the
/// reader cannot open without a password.
pub fn build_zip_with_encrypted(plain: &[(&str, &str)], encrypted: &[(&str, &str)]) -> Bytes {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in plain {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    for (name, content) in encrypted {
        let options = SimpleFileOptions::default().with_deprecated_encryption(b"hunter2");
        writer
            .start_file(*name, options)
            .expect("Failed to start encrypted zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write encrypted zip entry");
    }

    let cursor = writer.finish().expect("Failed to finish zip");
    Bytes::from(cursor.into_inner())
}

/// A small two-file site nested under `acme-site-main/`, as exported by most
/// site builders.
pub fn acme_site_zip() -> Bytes {
    build_zip(&[
        ("acme-site-main/", ""),
        (
            "acme-site-main/index.html",
            "<html><head><title>Acme</title><link rel=\"stylesheet\" href=\"css/main.css\"></head><body>Hi</body></html>",
        ),
        ("acme-site-main/css/main.css", "body { color: #333; }"),
    ])
}
