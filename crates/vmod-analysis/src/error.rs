//! Error types for the analysis layer.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while producing a report section.
///
/// These propagate to the HTTP handler unchanged. Substituting defaults for
/// a failed analyzer would make failures look like low-confidence successes,
/// so a failed section fails the whole request instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Media error: {0}")]
    Media(#[from] vmod_media::MediaError),

    #[error("Heatmap error: {0}")]
    Heatmap(#[from] vmod_heatmap::HeatmapError),

    #[error("Inference collaborator request failed: {0}")]
    InferenceRequest(#[from] reqwest::Error),

    #[error("Inference collaborator returned malformed output: {0}")]
    InferenceResponse(String),

    #[error("Inference collaborator rejected the request: {status}: {message}")]
    InferenceRejected { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Create a malformed-response error.
    pub fn response(message: impl Into<String>) -> Self {
        Self::InferenceResponse(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
