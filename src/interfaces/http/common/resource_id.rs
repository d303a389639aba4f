//! Numeric resource identifiers taken from the route path

use super::ApiError;

/// Parse a path segment as a positive resource id.
///
/// Anything that is not a base-10 integer greater than zero is
/// `InvalidResourceId`.
pub fn parse_resource_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidResourceId),
    }
}
