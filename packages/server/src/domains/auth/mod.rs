//! Auth domain - verifies dashboard-issued JWTs
//!
//! Sign-in and role assignment happen in the dashboard; this service only
//! checks the token and the role it carries.

pub mod jwt;

pub use jwt::{Claims, JwtService, ELEVATED_ROLES};
