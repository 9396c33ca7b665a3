//! Template slugs.
//!
//! A slug names one uploaded artifact set and is the first segment of every
//! object key the set owns. Canonical form is lowercase ASCII letters, digits,
//! and single hyphens, with no hyphen at either end, at least two characters
//! long.

use std::fmt;

use thiserror::Error;

/// Shortest canonical slug accepted.
pub const MIN_SLUG_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug \"{input}\" normalizes to \"{normalized}\", which is shorter than 2 characters")]
    TooShort { input: String, normalized: String },

    #[error("slug \"{0}\" is not in canonical form")]
    NotCanonical(String),
}

/// Normalize raw input into canonical slug form.
///
/// Lowercases, maps every character outside `[a-z0-9-]` to a hyphen,
/// collapses hyphen runs, and trims hyphens from both ends. Idempotent.
pub fn normalize_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        let ch = ch.to_ascii_lowercase();
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '-'
        };
        if ch == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(ch);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// A canonical slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Normalize operator input into a slug.
    pub fn from_input(input: &str) -> Result<Self, SlugError> {
        let normalized = normalize_slug(input);
        if normalized.len() < MIN_SLUG_LEN {
            return Err(SlugError::TooShort {
                input: input.to_string(),
                normalized,
            });
        }
        Ok(Self(normalized))
    }

    /// Accept only input that is already canonical (request paths, host names).
    pub fn parse_canonical(input: &str) -> Result<Self, SlugError> {
        let slug = Self::from_input(input)?;
        if slug.0 != input {
            return Err(SlugError::NotCanonical(input.to_string()));
        }
        Ok(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Object store key for a path inside this slug's artifact set.
    pub fn object_key(&self, path: &str) -> String {
        format!("{}/{}", self.0, path)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
