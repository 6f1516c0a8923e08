//! Application state.

use std::sync::Arc;

use tokio::sync::Semaphore;

use vmod_analysis::{
    AnalysisProvider, HttpInferenceClient, MockProvider, RealProvider, RealProviderConfig,
};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Both providers are behind the same trait object type, so handlers cannot
/// tell the real and mock pipelines apart. The semaphore serializes heavy
/// analysis runs: a second concurrent upload queues for a permit instead of
/// running FFmpeg passes side by side.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub provider: Arc<dyn AnalysisProvider>,
    pub mock_provider: Arc<dyn AnalysisProvider>,
    pub analysis_permits: Arc<Semaphore>,
}

impl AppState {
    /// Create new application state with the HTTP inference collaborator.
    pub fn new(config: ApiConfig) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&config.upload_dir)?;

        let inference = Arc::new(HttpInferenceClient::new(
            &config.inference_url,
            &config.asr_model,
        ));
        let provider = Arc::new(RealProvider::new(inference, RealProviderConfig::default()));

        Ok(Self::with_provider(config, provider))
    }

    /// Create state around an explicit provider (used by tests).
    pub fn with_provider(config: ApiConfig, provider: Arc<dyn AnalysisProvider>) -> Self {
        let permits = config.analysis_permits.max(1);
        Self {
            config,
            provider,
            mock_provider: Arc::new(MockProvider::new()),
            analysis_permits: Arc::new(Semaphore::new(permits)),
        }
    }
}
