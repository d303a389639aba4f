//! Token signing and password hashing

pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, JwtConfig, SigningError, TokenClaims, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
