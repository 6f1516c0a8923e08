//! The aggregated analysis report returned by `POST /api/analyze-video`.
//!
//! Field names follow the report JSON consumed by the moderation frontend
//! (camelCase throughout). Sections are optional: a section is present only
//! when its category was selected in [`crate::settings::AnalysisSettings`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::poi::PoiAnalysis;
use crate::risk::{RiskAnalysis, RiskLevel};

/// A timestamped event surfaced to the moderator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeyEvent {
    /// Timestamp in `MM:SS` format.
    pub time: String,
    /// Human-readable description.
    pub description: String,
    /// Optional moderation category (e.g. "Moderation", "18+").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Top-level aggregated report: one optional section per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<TranscriptionAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<SymbolsAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<ObjectsAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poi: Option<PoiAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenes: Option<ScenesAnalysis>,
}

/// Summary section: duration, tone, aggregate risk, key moments per category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAnalysis {
    /// Video duration in `MM:SS`.
    pub duration: String,
    /// Overall tone carried over from the transcript sentiment.
    pub overall_tone: String,
    /// Aggregate risk level across sections.
    pub risk_level: RiskLevel,
    /// One-line key-moment summary per analyzed category.
    pub key_moments: BTreeMap<String, String>,
    pub labels: Vec<String>,
}

/// Status of the transcript generation step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptionStatus {
    pub success: bool,
    /// Name of the ASR collaborator model that produced the transcript.
    pub model: String,
}

/// Subtitle generation flags.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubtitlesStatus {
    pub created: bool,
    pub synchronized: bool,
}

/// A detected language.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageEntry {
    pub name: String,
    pub primary: bool,
}

/// Sentiment score over a transcript span.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SentimentSegment {
    /// Span formatted as `"MM:SS - MM:SS"`.
    pub name: String,
    /// Sentiment score in -1.0..1.0.
    pub value: f64,
}

/// Overall transcript sentiment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverallSentiment {
    /// Tone name (e.g. "Positive", "Negative", "Neutral").
    pub tone: String,
    /// Mean sentiment score in -1.0..1.0.
    pub value: f64,
}

/// A recurring keyword in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordEntry {
    pub word: String,
    pub count: usize,
    /// Keyword category (e.g. "Slang", "Foreign").
    pub kind: String,
}

/// Transcription section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionAnalysis {
    pub generation_status: TranscriptionStatus,
    pub languages: Vec<LanguageEntry>,
    /// Fixed placeholder value; no audiovisual alignment is measured.
    pub lip_sync_accuracy: u32,
    /// Always `true`: the accuracy above is simulated, not measured.
    pub lip_sync_simulated: bool,
    pub subtitles_status: SubtitlesStatus,
    pub key_events: Vec<KeyEvent>,
    pub sentiment_analysis: Vec<SentimentSegment>,
    pub overall_sentiment: OverallSentiment,
    pub keyword_analysis: Vec<KeywordEntry>,
    pub text_labels: Vec<String>,
}

/// Scalar audio features reported by the audio collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioFeatures {
    /// Tempo in BPM.
    pub tempo: f64,
    /// Mean pitch in Hz.
    pub pitch_mean: f64,
    /// RMS loudness.
    pub loudness: f64,
    /// Mean mel-spectrogram energy.
    pub mel_spec_mean: f64,
    /// Mean chroma energy.
    pub chroma_mean: f64,
}

/// Audio section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub key_events: Vec<KeyEvent>,
    pub sound_effects: Vec<String>,
    pub music_patterns: Vec<String>,
    pub audio_features: AudioFeatures,
    pub labels: Vec<String>,
}

/// Symbols section (frame classification by an opaque image classifier).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymbolsAnalysis {
    pub detected_symbols: Vec<KeyEvent>,
    pub risk_analysis: RiskAnalysis,
    /// Occurrence count per symbol label.
    pub symbol_occurrences: BTreeMap<String, usize>,
    pub labels: Vec<String>,
}

/// Objects section (object detection by an opaque detector collaborator).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectsAnalysis {
    pub object_categories: Vec<String>,
    pub key_objects: Vec<KeyEvent>,
    /// Occurrence count per object label.
    pub object_occurrences: BTreeMap<String, usize>,
    /// Co-occurring object pairs ("X near Y").
    pub object_interactions: Vec<KeyEvent>,
    pub labels: Vec<String>,
}

/// One stitched run of same-type scenes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneSpan {
    /// Span formatted as `"MM:SS - MM:SS"`.
    pub time: String,
    /// Scene type name (cluster label).
    pub scene_type: String,
}

/// Scenes section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenesAnalysis {
    pub scene_count: usize,
    /// Mean stitched-scene duration in seconds.
    pub average_scene_duration: f64,
    pub scene_types: Vec<String>,
    pub key_scenes: Vec<SceneSpan>,
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_serializes_to_empty_object() {
        let report = AnalysisReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_key_event_kind_omitted_when_none() {
        let event = KeyEvent {
            time: "00:15".to_string(),
            description: "Loud noise".to_string(),
            kind: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_summary_wire_names() {
        let summary = SummaryAnalysis {
            duration: "02:30".to_string(),
            overall_tone: "Positive".to_string(),
            risk_level: RiskLevel::Low,
            key_moments: BTreeMap::new(),
            labels: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("overallTone").is_some());
        assert!(json.get("riskLevel").is_some());
    }
}
