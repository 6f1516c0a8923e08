//! Video analysis handlers.
//!
//! `POST /api/analyze-video` runs the full pipeline against the inference
//! collaborators; `POST /api/mock-analyze-video` serves the canned report
//! through the same code path so the two endpoints cannot drift apart.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use vmod_analysis::{run_analysis, AnalysisProvider};
use vmod_models::{AnalysisReport, AnalysisSettings};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Response wrapper matching the frontend contract.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub results: AnalysisReport,
}

/// Uploaded video written to a request-scoped temp file.
///
/// The file is deleted when this drops, including on analysis failure.
pub(crate) struct SavedUpload {
    file: tempfile::NamedTempFile,
    pub bytes: u64,
}

impl SavedUpload {
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

/// Parsed multipart form of the analyze endpoints.
pub(crate) struct UploadForm {
    pub video: SavedUpload,
    pub settings: AnalysisSettings,
}

/// Read the `video` file part and optional `settings` JSON part.
pub(crate) async fn read_upload(
    mut multipart: Multipart,
    upload_dir: &Path,
) -> ApiResult<UploadForm> {
    let mut video: Option<SavedUpload> = None;
    let mut settings = AnalysisSettings::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("video") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read video part: {e}")))?;

                let file = tempfile::Builder::new()
                    .prefix("upload_")
                    .suffix(".mp4")
                    .tempfile_in(upload_dir)
                    .map_err(|e| ApiError::internal(e.to_string()))?;
                tokio::fs::write(file.path(), &data)
                    .await
                    .map_err(|e| ApiError::internal(e.to_string()))?;

                debug!(bytes = data.len(), path = %file.path().display(), "Saved upload");
                video = Some(SavedUpload {
                    file,
                    bytes: data.len() as u64,
                });
            }
            Some("settings") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read settings: {e}")))?;
                settings = serde_json::from_str(&text)
                    .map_err(|e| ApiError::bad_request(format!("Invalid settings JSON: {e}")))?;
            }
            _ => {}
        }
    }

    let video = video.ok_or_else(|| ApiError::bad_request("No video file provided"))?;
    Ok(UploadForm { video, settings })
}

async fn analyze_with(
    state: &AppState,
    provider: &Arc<dyn AnalysisProvider>,
    kind: &'static str,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let form = read_upload(multipart, &state.config.upload_dir).await?;
    metrics::record_upload_bytes(form.video.bytes);

    // Analyses run one at a time; later uploads queue here.
    let queued = Instant::now();
    let _permit = state
        .analysis_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Analysis queue closed"))?;
    metrics::record_queue_wait(queued.elapsed().as_secs_f64());

    let start = Instant::now();
    let results = run_analysis(provider.as_ref(), form.video.path(), &form.settings)
        .await
        .inspect_err(|_| metrics::record_analysis_failed(kind))?;
    let duration = start.elapsed().as_secs_f64();
    metrics::record_analysis(kind, duration);

    info!(kind, duration_secs = duration, "Video analysis finished");
    Ok(Json(AnalyzeResponse { results }))
}

/// `POST /api/analyze-video` — run the real pipeline on the uploaded video.
pub async fn analyze_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let provider = Arc::clone(&state.provider);
    analyze_with(&state, &provider, "real", multipart).await
}

/// `POST /api/mock-analyze-video` — canned report for frontend development.
pub async fn mock_analyze_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let provider = Arc::clone(&state.mock_provider);
    analyze_with(&state, &provider, "mock", multipart).await
}
