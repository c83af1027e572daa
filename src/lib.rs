//! # Parklot
//!
//! Parking session and slot allocation engine with a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Business logic: parking orchestration, slot pool,
//!   daily closing aggregation
//! - **infrastructure**: External concerns (database, migrations,
//!   repository implementations)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

#[cfg(test)]
pub mod test_support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::create_api_router;
