//! Shared HTTP building blocks: envelopes, errors and extractors

pub mod error;
pub mod resource_id;
pub mod response;
pub mod validated_json;

pub use error::ApiError;
pub use resource_id::parse_resource_id;
pub use response::{ApiResponse, ErrorBody, PaginatedResponse};
pub use validated_json::ValidatedJson;
