//! Placeholder AI-insights endpoint.

use axum::extract::{Multipart, State};
use axum::Json;

use vmod_analysis::AiInsights;

use crate::error::ApiResult;
use crate::handlers::analyze::read_upload;
use crate::state::AppState;

/// `POST /api/ai-insights` — canned insights for the uploaded video.
///
/// No generative model is wired up; the response carries a `placeholder`
/// marker so the frontend cannot present it as model output.
pub async fn ai_insights(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AiInsights>> {
    let form = read_upload(multipart, &state.config.upload_dir).await?;
    let insights = state.provider.insights(form.video.path()).await?;
    Ok(Json(insights))
}
