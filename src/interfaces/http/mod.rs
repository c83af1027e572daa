//! HTTP REST API interfaces
//!
//! - `common`: response envelope, pagination, validated JSON extractor
//! - `handlers`: request handlers for all resources
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod handlers;
pub mod router;

pub use router::create_api_router;
