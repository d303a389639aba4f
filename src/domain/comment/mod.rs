//! Comment aggregate

pub mod model;
pub mod repository;

pub use model::{Comment, NewComment};
pub use repository::CommentRepository;
