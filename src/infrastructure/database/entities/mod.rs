//! Database entities module

pub mod comment;
pub mod post;
pub mod user;

pub use comment::Entity as Comment;
pub use post::Entity as Post;
pub use user::Entity as User;
