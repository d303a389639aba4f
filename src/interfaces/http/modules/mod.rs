pub mod auth;
pub mod comments;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod request_id;
