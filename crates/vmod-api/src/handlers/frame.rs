//! Single-frame extraction endpoint.

use std::path::{Component, Path, PathBuf};

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::debug;

use vmod_media::extract_frame_jpeg;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    #[serde(default)]
    pub video_path: String,
}

/// Resolve a client-supplied video path inside the upload directory.
///
/// Only plain relative paths are accepted; absolute paths and `..`
/// components are rejected so the endpoint cannot read outside the
/// upload directory.
pub(crate) fn resolve_upload_path(upload_dir: &Path, video_path: &str) -> ApiResult<PathBuf> {
    if video_path.is_empty() {
        return Err(ApiError::bad_request("Video path not provided"));
    }

    let relative = Path::new(video_path);
    let safe = relative.components().all(|c| matches!(c, Component::Normal(_)));
    if relative.is_absolute() || !safe {
        return Err(ApiError::bad_request("Invalid video path"));
    }

    Ok(upload_dir.join(relative))
}

/// `GET /api/frame/:n?video_path=...` — one video frame as JPEG.
pub async fn get_frame(
    State(state): State<AppState>,
    UrlPath(frame_number): UrlPath<u64>,
    Query(query): Query<FrameQuery>,
) -> ApiResult<impl IntoResponse> {
    let path = resolve_upload_path(&state.config.upload_dir, &query.video_path)?;
    debug!(frame = frame_number, path = %path.display(), "Frame requested");

    let jpeg = extract_frame_jpeg(&path, frame_number).await?;
    metrics::record_frame_served();

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg))
}
