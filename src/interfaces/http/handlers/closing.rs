//! Daily closing report handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ClosingAggregator;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse};

/// Closing handler state
#[derive(Clone)]
pub struct ClosingAppState {
    pub aggregator: Arc<ClosingAggregator>,
    pub currency: String,
}

/// Daily closing report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyClosingDto {
    /// Total revenue in currency units
    pub total_revenue: f64,
    /// Number of sessions closed within the day
    pub session_count: u64,
    /// Currency code (ISO 4217)
    pub currency: String,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct DailyClosingQuery {
    /// Any instant within the day to report on; defaults to now
    pub reference_time: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/closing/daily",
    tag = "Closing",
    params(DailyClosingQuery),
    responses(
        (status = 200, description = "Revenue summary for the day", body = ApiResponse<DailyClosingDto>),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn daily_closing(
    State(state): State<ClosingAppState>,
    Query(query): Query<DailyClosingQuery>,
) -> Result<Json<ApiResponse<DailyClosingDto>>, ApiError> {
    let reference = query.reference_time.unwrap_or_else(Utc::now);
    match state.aggregator.daily_summary(reference).await {
        Ok(summary) => Ok(Json(ApiResponse::success(DailyClosingDto {
            total_revenue: summary.total_cents as f64 / 100.0,
            session_count: summary.session_count,
            currency: state.currency.clone(),
        }))),
        Err(e) => Err(domain_error_response(&e)),
    }
}
