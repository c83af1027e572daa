//! Common API types: response envelope, pagination, error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response wrapper.
///
/// Every REST endpoint returns data in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination parameters for list requests
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

impl PaginationParams {
    /// Clamp to sane bounds: page >= 1, 1 <= limit <= 100.
    pub fn clamped(&self) -> (u64, u64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

/// Paginated response: a slice of data plus page metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    /// Page size
    pub limit: u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Error half of a handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain error to its HTTP status and response envelope.
pub fn domain_error_response(err: &DomainError) -> ApiError {
    let status = match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::DuplicateActivePlate(_)
        | DomainError::NoSlotAvailable
        | DomainError::SlotOccupied(_) => StatusCode::CONFLICT,
        DomainError::InvalidTiming(_) | DomainError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
