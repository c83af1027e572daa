//! Session API handlers: entry, exit, list, get, edit, delete

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::ParkingService;
use crate::domain::{
    DomainError, ParkingSession, SessionFilter, SessionPatch, VehicleType,
};
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, PaginatedResponse, PaginationParams,
    ValidatedJson,
};

/// Session handler state
#[derive(Clone)]
pub struct SessionAppState {
    pub parking: Arc<ParkingService>,
}

// ── DTOs ────────────────────────────────────────────────────────

/// Parking session DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    pub plate: String,
    pub vehicle_type: String,
    pub is_electric: bool,
    pub slot: u32,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    /// Final cost in currency units, present once closed
    pub cost: Option<f64>,
    pub status: String,
}

impl SessionDto {
    pub fn from_domain(s: ParkingSession) -> Self {
        Self {
            id: s.id,
            plate: s.plate,
            vehicle_type: s.vehicle_type.as_str().to_string(),
            is_electric: s.is_electric,
            slot: s.slot,
            entry_time: s.entry_time,
            exit_time: s.exit_time,
            cost: s.cost_cents.map(|c| c as f64 / 100.0),
            status: s.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterEntryRequest {
    #[validate(length(min = 1, max = 16, message = "must be 1-16 characters"))]
    pub plate: String,
    /// "Motorcycle" or "Car"
    pub vehicle_type: String,
    #[serde(default)]
    pub is_electric: bool,
    /// Defaults to now; must not be in the future
    pub entry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterExitRequest {
    #[validate(length(min = 1, max = 16, message = "must be 1-16 characters"))]
    pub plate: String,
    /// Defaults to now; must be after the session's entry time
    pub exit_time: Option<DateTime<Utc>>,
}

/// Distinguishes an absent field from an explicit `null`: an absent field
/// deserializes to `None` (leave alone), `null` to `Some(None)` (clear).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Administrative session correction. Omitted fields are untouched;
/// `exit_time: null` clears the exit and reopens the session.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSessionRequest {
    #[validate(length(min = 1, max = 16, message = "must be 1-16 characters"))]
    pub plate: Option<String>,
    /// "Motorcycle" or "Car"
    pub vehicle_type: Option<String>,
    pub is_electric: Option<bool>,
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub exit_time: Option<Option<DateTime<Utc>>>,
    #[validate(range(min = 1, message = "slot numbers are 1-based"))]
    pub slot: Option<u32>,
    /// Explicit cost override in currency units; otherwise recomputed
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: Option<f64>,
}

/// Session list filters
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SessionListQuery {
    /// Case-insensitive substring match on the plate
    pub search: Option<String>,
}

fn parse_vehicle_type(s: &str) -> Result<VehicleType, ApiError> {
    VehicleType::from_str(s).ok_or_else(|| {
        domain_error_response(&DomainError::Validation(format!(
            "unknown vehicle type '{}', expected 'Motorcycle' or 'Car'",
            s
        )))
    })
}

// ── Handlers ────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/sessions/entry",
    tag = "Sessions",
    request_body = RegisterEntryRequest,
    responses(
        (status = 201, description = "Session created", body = ApiResponse<SessionDto>),
        (status = 409, description = "Duplicate active plate or lot full"),
        (status = 422, description = "Invalid field value")
    )
)]
pub async fn register_entry(
    State(state): State<SessionAppState>,
    ValidatedJson(body): ValidatedJson<RegisterEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionDto>>), ApiError> {
    let vehicle_type = parse_vehicle_type(&body.vehicle_type)?;
    match state
        .parking
        .register_entry(&body.plate, vehicle_type, body.is_electric, body.entry_time)
        .await
    {
        Ok(session) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(SessionDto::from_domain(session))),
        )),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/sessions/exit",
    tag = "Sessions",
    request_body = RegisterExitRequest,
    responses(
        (status = 200, description = "Session closed with cost", body = ApiResponse<SessionDto>),
        (status = 404, description = "No active session for plate"),
        (status = 422, description = "Exit time not after entry time")
    )
)]
pub async fn register_exit(
    State(state): State<SessionAppState>,
    ValidatedJson(body): ValidatedJson<RegisterExitRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    match state.parking.register_exit(&body.plate, body.exit_time).await {
        Ok(session) => Ok(Json(ApiResponse::success(SessionDto::from_domain(session)))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    params(SessionListQuery, PaginationParams),
    responses(
        (status = 200, description = "Page of sessions", body = PaginatedResponse<SessionDto>)
    )
)]
pub async fn list_sessions(
    State(state): State<SessionAppState>,
    Query(query): Query<SessionListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<SessionDto>>, ApiError> {
    let filter = SessionFilter {
        plate_contains: query.search,
    };
    let (page, limit) = pagination.clamped();
    match state.parking.list_sessions(&filter, page, limit).await {
        Ok((sessions, total)) => {
            let items = sessions.into_iter().map(SessionDto::from_domain).collect();
            Ok(Json(PaginatedResponse::new(items, total, page, limit)))
        }
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = ApiResponse<SessionDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_session(
    State(state): State<SessionAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    match state.parking.get_session(id).await {
        Ok(session) => Ok(Json(ApiResponse::success(SessionDto::from_domain(session)))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Updated session", body = ApiResponse<SessionDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Plate or slot conflict"),
        (status = 422, description = "Invalid field value or timing")
    )
)]
pub async fn update_session(
    State(state): State<SessionAppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateSessionRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    let vehicle_type = match body.vehicle_type {
        Some(ref s) => Some(parse_vehicle_type(s)?),
        None => None,
    };
    let patch = SessionPatch {
        plate: body.plate,
        vehicle_type,
        is_electric: body.is_electric,
        entry_time: body.entry_time,
        exit_time: body.exit_time,
        slot: body.slot,
        cost_cents: body.cost.map(|c| (c * 100.0).round() as i64),
    };
    match state.parking.edit_session(id, patch).await {
        Ok(session) => Ok(Json(ApiResponse::success(SessionDto::from_domain(session)))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session deleted", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_session(
    State(state): State<SessionAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match state.parking.delete_session(id).await {
        Ok(()) => Ok(Json(ApiResponse::success(format!("Session {} deleted", id)))),
        Err(e) => Err(domain_error_response(&e)),
    }
}
