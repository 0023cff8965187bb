//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::auth::require_auth;
use crate::handlers::{
    apply_to_job, create_job, delete_application, get_application, get_dashboard_stats, get_job,
    get_profile, health, list_jobs, list_my_applications, list_user_applications,
    list_user_notifications, login, mark_notification_read, me, ready, register, update_profile,
    upload_document,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Credential endpoints, rate limited per client IP
    let auth_rate_limiter = Arc::new(
        RateLimiterCache::per_minute(state.config.auth_rate_limit_per_minute)
            .trust_proxy_headers(state.config.trust_proxy_headers),
    );
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/login", post(login))
        .layer(middleware::from_fn_with_state(
            auth_rate_limiter,
            rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id", get(get_job));

    // Everything below requires a valid bearer token
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/jobs/:job_id/apply", post(apply_to_job))
        .route("/applications", get(list_my_applications))
        .route(
            "/applications/:application_id",
            get(get_application).delete(delete_application),
        )
        .route("/users/:user_id/applications", get(list_user_applications))
        .route("/users/:user_id/notifications", get(list_user_notifications))
        .route(
            "/notifications/:notification_id/read",
            post(mark_notification_read),
        )
        .route(
            "/users/:user_id/profile",
            get(get_profile).put(update_profile),
        )
        .route("/users/:user_id/profile/documents", post(upload_document))
        .route("/admin/jobs", post(create_job))
        .route("/admin/stats", get(get_dashboard_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(public_routes)
        .merge(protected_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
