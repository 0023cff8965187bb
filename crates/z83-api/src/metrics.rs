//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "z83_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "z83_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "z83_http_requests_in_flight";

    // Auth metrics
    pub const AUTH_FAILURES_TOTAL: &str = "z83_auth_failures_total";
    pub const LOGINS_TOTAL: &str = "z83_logins_total";
    pub const REGISTRATIONS_TOTAL: &str = "z83_registrations_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "z83_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a rejected authentication or authorization attempt.
pub fn record_auth_failure(reason: &'static str) {
    counter!(names::AUTH_FAILURES_TOTAL, "reason" => reason).increment(1);
}

/// Record a login attempt outcome (`success` / `failure`).
pub fn record_login(outcome: &'static str) {
    counter!(names::LOGINS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a completed registration.
pub fn record_registration(role: &str) {
    let labels = [("role", role.to_string())];
    counter!(names::REGISTRATIONS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[0-9]+(/|$)").expect("valid regex"));

/// Replace record IDs in a path so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    // Applied twice so adjacent IDs ("/1/2") are both replaced
    let once = NUMERIC_SEGMENT.replace_all(path, "/:id$1");
    NUMERIC_SEGMENT.replace_all(&once, "/:id$1").into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/users/42/applications"),
            "/api/users/:id/applications"
        );
        assert_eq!(sanitize_path("/api/applications/7"), "/api/applications/:id");
        assert_eq!(sanitize_path("/api/jobs/1/2"), "/api/jobs/:id/:id");
        assert_eq!(sanitize_path("/api/auth/login"), "/api/auth/login");
    }
}
