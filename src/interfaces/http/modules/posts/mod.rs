//! Posts module: public reads, authenticated writes, owner-only mutation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
