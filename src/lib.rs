//! # Blog Service
//!
//! Blog backend: users register and log in, create posts, and comment on
//! posts. Requests are authenticated with HMAC-signed bearer tokens and only
//! a post's author may update or delete it.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, repository traits and errors
//! - **application**: registration/login and blog use cases
//! - **infrastructure**: token signing, password hashing, SeaORM persistence
//! - **interfaces**: REST API with the authentication and ownership gates
//! - **server**: process lifecycle shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
