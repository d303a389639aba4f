//! Domain layer - entities, repository interfaces and errors

pub mod comment;
pub mod error;
pub mod post;
pub mod repositories;
pub mod user;

pub use comment::{Comment, CommentRepository, NewComment};
pub use error::{DomainError, DomainResult};
pub use post::{NewPost, Post, PostChanges, PostRepository};
pub use repositories::RepositoryProvider;
pub use user::{NewUser, User, UserRepository};
