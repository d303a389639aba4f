//! Post aggregate

pub mod model;
pub mod repository;

pub use model::{NewPost, Post, PostChanges};
pub use repository::PostRepository;
