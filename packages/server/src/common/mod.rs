// Common types and utilities shared across the application

pub mod content_type;
pub mod slug;
pub mod utils;

pub use content_type::*;
pub use slug::{normalize_slug, Slug, SlugError};
