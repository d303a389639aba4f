//! User aggregate
//!
//! Contains the User entity and the credential store interface.

pub mod model;
pub mod repository;

pub use model::{NewUser, User};
pub use repository::UserRepository;
