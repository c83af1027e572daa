//! Request handlers for all resources

pub mod closing;
pub mod health;
pub mod sessions;
