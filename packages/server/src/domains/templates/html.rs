//! Base URL injection for served HTML.
//!
//! Preview pages are served without the slug in their path, so each document
//! gets a `<base href>` pointing at the slug's virtual host. The tag goes
//! right after the opening `<head>`; failing that, a `<head>` holding it is
//! opened right after `<html>`; failing that, it is prepended.
//!
//! Tags are located with a small scanner, not a parser. It skips comments,
//! matches tag names case-insensitively on a name boundary (`<header>` is not
//! `<head>`), and ignores `>` inside quoted attribute values.

/// Insert `<base href="{base_href}">` into `document`.
pub fn inject_base_href(document: &str, base_href: &str) -> String {
    let base_tag = format!(r#"<base href="{}">"#, base_href);

    if let Some(at) = find_open_tag_end(document, "head") {
        return splice(document, at, &base_tag);
    }
    if let Some(at) = find_open_tag_end(document, "html") {
        return splice(document, at, &format!("<head>{}</head>", base_tag));
    }

    let mut out = String::with_capacity(base_tag.len() + document.len());
    out.push_str(&base_tag);
    out.push_str(document);
    out
}

fn splice(document: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(document.len() + insert.len());
    out.push_str(&document[..at]);
    out.push_str(insert);
    out.push_str(&document[at..]);
    out
}

/// Byte offset just past the `>` of the first opening `<{name}` tag.
fn find_open_tag_end(document: &str, name: &str) -> Option<usize> {
    let bytes = document.as_bytes();
    let name = name.as_bytes();
    let mut i = 0;

    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'<') {
        let start = i + offset;
        let rest = &bytes[start + 1..];

        if rest.starts_with(b"!--") {
            let body = start + 4;
            let close = find_subslice(&bytes[body..], b"-->")?;
            i = body + close + 3;
            continue;
        }

        if rest.len() > name.len() && rest[..name.len()].eq_ignore_ascii_case(name) {
            let boundary = rest[name.len()];
            if boundary == b'>' || boundary == b'/' || boundary.is_ascii_whitespace() {
                return tag_end(bytes, start + 1 + name.len());
            }
        }

        i = start + 1;
    }

    None
}

/// Offset past the `>` closing a tag whose attributes start at `from`.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in bytes[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + offset + 1),
            None => {}
        }
    }
    None
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
