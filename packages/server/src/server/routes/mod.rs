// HTTP routes
pub mod health;
pub mod preview;
pub mod templates;

pub use health::*;
pub use preview::*;
pub use templates::*;
