//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vmod_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vmod_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vmod_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "vmod_analyses_total";
    pub const ANALYSES_FAILED_TOTAL: &str = "vmod_analyses_failed_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "vmod_analysis_duration_seconds";
    pub const ANALYSIS_QUEUE_WAIT_SECONDS: &str = "vmod_analysis_queue_wait_seconds";
    pub const UPLOAD_BYTES_TOTAL: &str = "vmod_upload_bytes_total";

    // Frame endpoint metrics
    pub const FRAMES_SERVED_TOTAL: &str = "vmod_frames_served_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vmod_rate_limit_hits_total";
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

/// Record a completed analysis run.
pub fn record_analysis(kind: &str, duration_secs: f64) {
    let labels = [("kind", kind.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed analysis run.
pub fn record_analysis_failed(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!(names::ANALYSES_FAILED_TOTAL, &labels).increment(1);
}

/// Record time spent waiting for an analysis permit.
pub fn record_queue_wait(duration_secs: f64) {
    histogram!(names::ANALYSIS_QUEUE_WAIT_SECONDS).record(duration_secs);
}

/// Record uploaded bytes.
pub fn record_upload_bytes(bytes: u64) {
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes);
}

/// Record a frame served by the frame endpoint.
pub fn record_frame_served() {
    counter!(names::FRAMES_SERVED_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    // Frame numbers
    let path = regex_lite::Regex::new(r"/frame/[0-9]+")
        .unwrap()
        .replace_all(path, "/frame/:n");
    // Any other numeric path segment
    let path = regex_lite::Regex::new(r"/[0-9]+(/|$)")
        .unwrap()
        .replace_all(&path, "/:id$1");
    path.to_string()
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
        assert_eq!(sanitize_path("/api/frame/1234"), "/api/frame/:n");
        assert_eq!(sanitize_path("/api/analyze-video"), "/api/analyze-video");
    }
}
