//! The polymorphic analysis-provider interface.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use vmod_models::{
    AnalysisReport, AnalysisSettings, AudioAnalysis, ObjectsAnalysis, PoiAnalysis,
    ScenesAnalysis, SummaryAnalysis, SymbolsAnalysis, TranscriptionAnalysis,
};

use crate::error::AnalysisResult;

/// Placeholder AI-insights payload for `POST /api/ai-insights`.
///
/// The endpoint exists for frontend development; no generative model is
/// wired up, and the `placeholder` flag says so on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsights {
    /// Always `true`: these insights are canned, not generated.
    pub placeholder: bool,
    pub insights: Vec<String>,
}

impl Default for AiInsights {
    fn default() -> Self {
        Self {
            placeholder: true,
            insights: vec![
                "Engagement peaks in the first third of the video".to_string(),
                "No high-risk segments were flagged for manual review".to_string(),
                "Attention is concentrated in the center of the frame".to_string(),
            ],
        }
    }
}

/// One report section per method; implementations are `{mock, real}`.
///
/// The API layer only ever sees this trait, so it cannot tell the canned
/// and real pipelines apart.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn transcription(&self, video: &Path) -> AnalysisResult<TranscriptionAnalysis>;

    async fn audio(&self, video: &Path) -> AnalysisResult<AudioAnalysis>;

    async fn symbols(&self, video: &Path) -> AnalysisResult<SymbolsAnalysis>;

    async fn objects(&self, video: &Path) -> AnalysisResult<ObjectsAnalysis>;

    async fn poi(&self, video: &Path) -> AnalysisResult<PoiAnalysis>;

    async fn scenes(&self, video: &Path) -> AnalysisResult<ScenesAnalysis>;

    /// Build the summary from the already-computed sections of `report`.
    async fn summary(
        &self,
        video: &Path,
        report: &AnalysisReport,
    ) -> AnalysisResult<SummaryAnalysis>;

    /// Placeholder insights for the AI-insights endpoint.
    async fn insights(&self, video: &Path) -> AnalysisResult<AiInsights>;
}

/// Run the selected analyses and aggregate the report.
///
/// Sections run sequentially — the whole pipeline is single-video,
/// single-pass. The summary runs last because it aggregates the other
/// sections. Any section failure aborts the run.
pub async fn run_analysis(
    provider: &dyn AnalysisProvider,
    video: &Path,
    settings: &AnalysisSettings,
) -> AnalysisResult<AnalysisReport> {
    let mut report = AnalysisReport::default();

    if settings.transcription {
        report.transcription = Some(provider.transcription(video).await?);
    }
    if settings.audio {
        report.audio = Some(provider.audio(video).await?);
    }
    if settings.symbols {
        report.symbols = Some(provider.symbols(video).await?);
    }
    if settings.objects {
        report.objects = Some(provider.objects(video).await?);
    }
    if settings.poi {
        report.poi = Some(provider.poi(video).await?);
    }
    if settings.scenes {
        report.scenes = Some(provider.scenes(video).await?);
    }
    if settings.summary {
        report.summary = Some(provider.summary(video, &report).await?);
    }

    info!(
        transcription = report.transcription.is_some(),
        poi = report.poi.is_some(),
        "Analysis run complete"
    );
    Ok(report)
}
