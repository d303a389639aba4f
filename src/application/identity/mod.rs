//! Identity module: registration and authentication

pub mod service;

pub use service::{AuthResult, AuthService, Registration};
