// Agency Site - Template Preview Core
//
// This crate hosts operator-uploaded static site templates: zip archives are
// unpacked into object storage under `{slug}/{path}` and served back per slug
// on a preview virtual host.
//
// External services (object storage, publication records) sit behind the
// traits in kernel/ so every activity can run against in-memory doubles.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
