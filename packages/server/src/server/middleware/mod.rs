// HTTP middleware
pub mod jwt_auth;
pub mod preview_host;

pub use jwt_auth::*;
pub use preview_host::*;
