//! Analysis providers for the moderation pipeline.
//!
//! Every analytical capability is delegated: pretrained models sit behind the
//! [`InferenceClient`] trait, and the report-producing logic sits behind the
//! [`AnalysisProvider`] trait with exactly two variants:
//!
//! - [`MockProvider`] — canned report for frontend development, no I/O.
//! - [`RealProvider`] — samples the uploaded video, runs the heatmap and
//!   scene math locally, and shapes collaborator outputs into the report.
//!
//! Model handles are injected (`Arc<dyn InferenceClient>`); nothing is loaded
//! into process-global state. Failures propagate as [`AnalysisError`] — inner
//! stages never substitute placeholder values for a failed analysis.

pub mod error;
pub mod inference;
pub mod mock;
pub mod poi;
pub mod provider;
pub mod real;
pub mod scenes;

pub use error::{AnalysisError, AnalysisResult};
pub use inference::{
    AudioInference, HttpInferenceClient, InferenceClient, StaticInferenceClient,
};
pub use mock::MockProvider;
pub use provider::{run_analysis, AiInsights, AnalysisProvider};
pub use real::{RealProvider, RealProviderConfig};
