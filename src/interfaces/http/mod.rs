//! HTTP REST API interfaces
//!
//! - `common`: response envelopes, `ApiError`, `ValidatedJson`
//! - `middleware`: Authentication and Ownership gates
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use middleware::AuthenticatedUser;
pub use router::{create_api_router, ApiDoc, AppState};
