//! Application layer - use-case orchestration
//!
//! - **identity**: registration, login and the current-user lookup
//! - **blog**: posts and comments

pub mod blog;
pub mod identity;

pub use blog::{CommentService, PostService};
pub use identity::{AuthResult, AuthService, Registration};
