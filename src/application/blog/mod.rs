//! Posts and comments use-cases

pub mod comments;
pub mod posts;

pub use comments::CommentService;
pub use posts::PostService;
