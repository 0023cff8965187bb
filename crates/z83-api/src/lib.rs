//! Axum HTTP API server for the Z83 job board.
//!
//! This crate provides:
//! - Registration and login with bcrypt password hashing
//! - Signed session tokens verified on every protected route
//! - Ownership and role rules for account-scoped resources
//! - Job, application, notification and profile endpoints
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod state;
pub mod uploads;

pub use auth::{AuthUser, TokenKeys};
pub use config::{ApiConfig, AuthConfig, ConfigError, JwtSecret};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
