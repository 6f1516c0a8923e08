//! Shared data models for the ModScope moderation backend.
//!
//! This crate provides Serde-serializable types for:
//! - The aggregated analysis report and its per-category sections
//! - Analysis settings (which categories to run)
//! - Point-of-interest geometry (heat zones, hotspots, simulated gaze)
//! - Detector collaborator outputs (labels, detections)
//! - Risk scoring

pub mod label;
pub mod poi;
pub mod rect;
pub mod report;
pub mod risk;
pub mod settings;
pub mod timestamp;

// Re-export common types
pub use label::{Detection, Label, Transcript, TranscriptSegment};
pub use poi::{GazePoint, GazeTrack, HeatZone, Hotspot, PoiAnalysis};
pub use rect::PixelRect;
pub use report::{
    AnalysisReport, AudioAnalysis, AudioFeatures, KeyEvent, KeywordEntry, LanguageEntry,
    ObjectsAnalysis, OverallSentiment, SceneSpan, ScenesAnalysis, SentimentSegment,
    SubtitlesStatus, SummaryAnalysis, SymbolsAnalysis, TranscriptionAnalysis,
    TranscriptionStatus,
};
pub use risk::{RiskAnalysis, RiskLevel};
pub use settings::AnalysisSettings;
