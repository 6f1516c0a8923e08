//! API integration tests.
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`
//! against a state wired to the canned provider, so no FFmpeg binary or
//! model server is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use vmod_analysis::MockProvider;
use vmod_api::{create_router, ApiConfig, AppState};

const BOUNDARY: &str = "test-boundary-7a91";

fn test_router(upload_dir: &TempDir) -> Router {
    let config = ApiConfig {
        upload_dir: upload_dir.path().to_path_buf(),
        ..ApiConfig::default()
    };
    let state = AppState::with_provider(config, Arc::new(MockProvider::new()));
    create_router(state, None)
}

/// Build a multipart/form-data body with a video part and optional settings.
fn multipart_body(settings: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; \
             filename=\"clip.mp4\"\r\nContent-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"fake video bytes");
    body.extend_from_slice(b"\r\n");
    if let Some(settings) = settings {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"settings\"\r\n\r\n{settings}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_security_headers_present() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["X-Content-Type-Options"], "nosniff");
    assert_eq!(headers["X-Frame-Options"], "DENY");
    assert!(headers.contains_key("X-Request-ID"));
}

#[tokio::test]
async fn test_mock_analyze_returns_full_report() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(multipart_request(
            "/api/mock-analyze-video",
            multipart_body(None),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let results = &json["results"];
    assert!(results["summary"].is_object());
    assert!(results["transcription"].is_object());
    assert!(results["poi"].is_object());
    // Simulated data is marked as such on the wire.
    assert_eq!(results["poi"]["eyeTracking"]["simulated"], true);
    assert_eq!(results["transcription"]["lipSyncSimulated"], true);
}

#[tokio::test]
async fn test_analyze_respects_settings_selection() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let settings = r#"{"summary":false,"transcription":false,"audio":false,
        "symbols":false,"objects":false,"poi":true,"scenes":true}"#;
    let response = app
        .oneshot(multipart_request(
            "/api/mock-analyze-video",
            multipart_body(Some(settings)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let results = &json["results"];
    assert!(results["poi"].is_object());
    assert!(results["scenes"].is_object());
    assert!(results.get("summary").is_none());
    assert!(results.get("transcription").is_none());
}

#[tokio::test]
async fn test_analyze_without_video_part_is_400() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let body = format!("--{BOUNDARY}--\r\n").into_bytes();
    let response = app
        .oneshot(multipart_request("/api/analyze-video", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("No video file provided"));
}

#[tokio::test]
async fn test_analyze_with_invalid_settings_is_400() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(multipart_request(
            "/api/mock-analyze-video",
            multipart_body(Some("not json")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ai_insights_marked_placeholder() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(multipart_request("/api/ai-insights", multipart_body(None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["placeholder"], true);
    assert!(json["insights"].is_array());
}

#[tokio::test]
async fn test_admin_decision_acks() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin-decision")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"videoId":"abc","decision":"approve"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_frame_with_traversal_path_is_400() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/frame/0?video_path=../secret.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_frame_without_path_is_400() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/frame/0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = TempDir::new().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
