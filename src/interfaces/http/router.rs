//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ClosingAggregator, ParkingService};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::handlers::{closing, health, sessions};
use crate::interfaces::http::handlers::closing::ClosingAppState;
use crate::interfaces::http::handlers::sessions::SessionAppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Sessions
        sessions::register_entry,
        sessions::register_exit,
        sessions::list_sessions,
        sessions::get_session,
        sessions::update_session,
        sessions::delete_session,
        // Closing
        closing::daily_closing,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<sessions::SessionDto>,
            PaginationParams,
            // Sessions
            sessions::SessionDto,
            sessions::RegisterEntryRequest,
            sessions::RegisterExitRequest,
            sessions::UpdateSessionRequest,
            // Closing
            closing::DailyClosingDto,
            // Health
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Sessions", description = "Vehicle parking sessions: entry, exit, corrections"),
        (name = "Closing", description = "Daily revenue closing report (read-only)"),
    ),
    info(
        title = "Parklot API",
        version = "1.0.0",
        description = "REST API for the parking session and slot allocation engine",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    parking: Arc<ParkingService>,
    aggregator: Arc<ClosingAggregator>,
    currency: String,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = Router::new()
        .route(
            "/",
            get(sessions::list_sessions),
        )
        .route("/entry", post(sessions::register_entry))
        .route("/exit", put(sessions::register_exit))
        .route(
            "/{id}",
            get(sessions::get_session)
                .put(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .with_state(SessionAppState { parking });

    let closing_routes = Router::new()
        .route("/daily", get(closing::daily_closing))
        .with_state(ClosingAppState {
            aggregator,
            currency,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1/sessions", session_routes)
        .nest("/api/v1/closing", closing_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
