//! Response envelopes shared by every endpoint

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success code carried in the envelope.
pub const SUCCESS_CODE: i32 = 0;

/// Standard success envelope: `{"code": 0, "msg": "ok", "data": {...}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `0` on success
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// Failure envelope: `{"code": 2003, "msg": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable application error code
    pub code: i32,
    /// Human-readable description
    pub msg: String,
}

/// Page of items with paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> From<crate::shared::PaginatedResult<T>> for PaginatedResponse<T> {
    fn from(result: crate::shared::PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json, serde_json::json!({"code": 0, "msg": "ok", "data": 42}));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            code: 2003,
            msg: "missing".into(),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({"code": 2003, "msg": "missing"}));
    }
}
