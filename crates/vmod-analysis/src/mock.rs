//! Canned analysis provider for frontend development.
//!
//! Produces a fixed, fully-populated report without touching the uploaded
//! file or any collaborator. The numbers are invented but shaped exactly
//! like real output, so the frontend can be built against
//! `POST /api/mock-analyze-video` before a model server exists.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use vmod_models::{
    AnalysisReport, AudioAnalysis, AudioFeatures, GazePoint, GazeTrack, HeatZone, Hotspot,
    KeyEvent, KeywordEntry, LanguageEntry, ObjectsAnalysis, OverallSentiment, PixelRect,
    PoiAnalysis, RiskAnalysis, ScenesAnalysis, SceneSpan, SentimentSegment, SubtitlesStatus,
    SummaryAnalysis, SymbolsAnalysis, TranscriptionAnalysis, TranscriptionStatus,
};

use crate::error::AnalysisResult;
use crate::provider::{AiInsights, AnalysisProvider};

const MOCK_LABELS: [&str; 5] = ["Highlights", "Base", "18+", "Gray", "Black"];

fn labels() -> Vec<String> {
    MOCK_LABELS.iter().map(|s| s.to_string()).collect()
}

fn event(time: &str, description: &str, kind: Option<&str>) -> KeyEvent {
    KeyEvent {
        time: time.to_string(),
        description: description.to_string(),
        kind: kind.map(str::to_string),
    }
}

/// Provider that returns a fixed report regardless of input.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalysisProvider for MockProvider {
    async fn transcription(&self, _video: &Path) -> AnalysisResult<TranscriptionAnalysis> {
        Ok(TranscriptionAnalysis {
            generation_status: TranscriptionStatus {
                success: true,
                model: "whisper-fixture".to_string(),
            },
            languages: vec![
                LanguageEntry {
                    name: "English".to_string(),
                    primary: true,
                },
                LanguageEntry {
                    name: "Spanish".to_string(),
                    primary: false,
                },
            ],
            lip_sync_accuracy: 95,
            lip_sync_simulated: true,
            subtitles_status: SubtitlesStatus {
                created: true,
                synchronized: true,
            },
            key_events: vec![
                event("00:15", "Dramatic moment: sudden loud sound", Some("Moderation")),
                event(
                    "01:30",
                    "Possible policy violation: mention of restricted substances",
                    Some("18+"),
                ),
                event("02:45", "Viral moment: unexpected joke", Some("Viral")),
                event("03:45", "Suitable slot for an ad break", Some("Ads")),
            ],
            sentiment_analysis: vec![
                SentimentSegment {
                    name: "00:00 - 01:30".to_string(),
                    value: 0.2,
                },
                SentimentSegment {
                    name: "01:31 - 03:00".to_string(),
                    value: 0.8,
                },
                SentimentSegment {
                    name: "03:01 - 06:30".to_string(),
                    value: 0.9,
                },
            ],
            overall_sentiment: OverallSentiment {
                tone: "Positive".to_string(),
                value: 0.7,
            },
            keyword_analysis: vec![
                KeywordEntry {
                    word: "cryptocurrency".to_string(),
                    count: 5,
                    kind: "Slang".to_string(),
                },
                KeywordEntry {
                    word: "artificial intelligence".to_string(),
                    count: 3,
                    kind: "Foreign".to_string(),
                },
                KeywordEntry {
                    word: "blockchain".to_string(),
                    count: 2,
                    kind: "Slang".to_string(),
                },
            ],
            text_labels: labels(),
        })
    }

    async fn audio(&self, _video: &Path) -> AnalysisResult<AudioAnalysis> {
        Ok(AudioAnalysis {
            key_events: vec![
                event("00:30", "Audio event 1", None),
                event("02:15", "Audio event 2", None),
                event("04:00", "Audio event 3", None),
            ],
            sound_effects: vec![
                "Gunshot".to_string(),
                "Explosion".to_string(),
                "Siren".to_string(),
            ],
            music_patterns: vec![
                "Rock".to_string(),
                "Classical".to_string(),
                "Electronic".to_string(),
            ],
            audio_features: AudioFeatures {
                tempo: 120.0,
                pitch_mean: 220.0,
                loudness: 0.4,
                mel_spec_mean: -32.0,
                chroma_mean: 0.5,
            },
            labels: labels(),
        })
    }

    async fn symbols(&self, _video: &Path) -> AnalysisResult<SymbolsAnalysis> {
        let mut occurrences = BTreeMap::new();
        occurrences.insert("flag".to_string(), 3);
        occurrences.insert("emblem".to_string(), 1);
        occurrences.insert("banner".to_string(), 1);
        Ok(SymbolsAnalysis {
            detected_symbols: vec![
                event("00:45", "Symbol: flag", None),
                event("02:30", "Symbol: emblem", None),
                event("03:15", "Symbol: banner", None),
            ],
            risk_analysis: RiskAnalysis::from_score(0.5),
            symbol_occurrences: occurrences,
            labels: labels(),
        })
    }

    async fn objects(&self, _video: &Path) -> AnalysisResult<ObjectsAnalysis> {
        let mut occurrences = BTreeMap::new();
        occurrences.insert("person".to_string(), 4);
        occurrences.insert("car".to_string(), 2);
        occurrences.insert("tree".to_string(), 2);
        Ok(ObjectsAnalysis {
            object_categories: vec![
                "People".to_string(),
                "Items".to_string(),
                "Nature".to_string(),
                "Vehicles".to_string(),
            ],
            key_objects: vec![
                event("01:00", "Object: person", None),
                event("03:45", "Object: car", None),
                event("05:30", "Object: tree", None),
            ],
            object_occurrences: occurrences,
            object_interactions: vec![event("01:00", "person near car", None)],
            labels: labels(),
        })
    }

    async fn poi(&self, _video: &Path) -> AnalysisResult<PoiAnalysis> {
        Ok(PoiAnalysis {
            grid_width: 160,
            grid_height: 90,
            heat_zones: vec![
                HeatZone {
                    id: 0,
                    mean_intensity: 218.0,
                    area_px: 500,
                    bounds: PixelRect::new(60, 30, 40, 25),
                    centroid: (80.0, 42.0),
                    time: "00:00".to_string(),
                },
                HeatZone {
                    id: 1,
                    mean_intensity: 184.0,
                    area_px: 300,
                    bounds: PixelRect::new(20, 55, 25, 20),
                    centroid: (32.0, 65.0),
                    time: "03:15".to_string(),
                },
                HeatZone {
                    id: 2,
                    mean_intensity: 162.0,
                    area_px: 200,
                    bounds: PixelRect::new(120, 10, 20, 15),
                    centroid: (130.0, 17.0),
                    time: "06:30".to_string(),
                },
            ],
            attention_hotspots: vec![
                Hotspot {
                    id: 0,
                    x: 80,
                    y: 42,
                    intensity: 255.0,
                    time: "00:00".to_string(),
                },
                Hotspot {
                    id: 1,
                    x: 32,
                    y: 65,
                    intensity: 241.0,
                    time: "01:37".to_string(),
                },
                Hotspot {
                    id: 2,
                    x: 130,
                    y: 17,
                    intensity: 228.0,
                    time: "03:15".to_string(),
                },
                Hotspot {
                    id: 3,
                    x: 82,
                    y: 44,
                    intensity: 220.0,
                    time: "04:52".to_string(),
                },
                Hotspot {
                    id: 4,
                    x: 30,
                    y: 63,
                    intensity: 214.0,
                    time: "06:30".to_string(),
                },
            ],
            eye_tracking: GazeTrack::new(vec![
                GazePoint {
                    x: 80.0,
                    y: 42.0,
                    time: "00:00".to_string(),
                    duration_secs: 3.9,
                },
                GazePoint {
                    x: 33.0,
                    y: 64.0,
                    time: "03:15".to_string(),
                    duration_secs: 3.9,
                },
                GazePoint {
                    x: 129.0,
                    y: 18.0,
                    time: "06:30".to_string(),
                    duration_secs: 3.9,
                },
            ]),
            labels: labels(),
        })
    }

    async fn scenes(&self, _video: &Path) -> AnalysisResult<ScenesAnalysis> {
        Ok(ScenesAnalysis {
            scene_count: 3,
            average_scene_duration: 90.0,
            scene_types: vec![
                "Action".to_string(),
                "Dialogue".to_string(),
                "Scenery".to_string(),
                "Montage".to_string(),
            ],
            key_scenes: vec![
                SceneSpan {
                    time: "00:00 - 01:30".to_string(),
                    scene_type: "Action".to_string(),
                },
                SceneSpan {
                    time: "01:31 - 03:00".to_string(),
                    scene_type: "Dialogue".to_string(),
                },
                SceneSpan {
                    time: "03:01 - 04:30".to_string(),
                    scene_type: "Scenery".to_string(),
                },
            ],
            labels: labels(),
        })
    }

    async fn summary(
        &self,
        _video: &Path,
        _report: &AnalysisReport,
    ) -> AnalysisResult<SummaryAnalysis> {
        let mut key_moments = BTreeMap::new();
        key_moments.insert("transcription".to_string(), "4 key events".to_string());
        key_moments.insert("audio".to_string(), "3 notable sound effects".to_string());
        key_moments.insert("symbols".to_string(), "3 detected symbols".to_string());
        key_moments.insert("objects".to_string(), "3 key objects".to_string());
        key_moments.insert("poi".to_string(), "3 heat zones".to_string());
        key_moments.insert("scenes".to_string(), "3 main scene types".to_string());
        Ok(SummaryAnalysis {
            duration: "06:30".to_string(),
            overall_tone: "Positive".to_string(),
            risk_level: vmod_models::RiskLevel::Medium,
            key_moments,
            labels: labels(),
        })
    }

    async fn insights(&self, _video: &Path) -> AnalysisResult<AiInsights> {
        Ok(AiInsights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gaze_is_marked_simulated() {
        let poi = MockProvider::new().poi(Path::new("x.mp4")).await.unwrap();
        assert!(poi.eye_tracking.simulated);
        assert_eq!(poi.attention_hotspots.len(), 5);
        assert_eq!(poi.heat_zones.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_lip_sync_is_marked_simulated() {
        let t = MockProvider::new()
            .transcription(Path::new("x.mp4"))
            .await
            .unwrap();
        assert!(t.lip_sync_simulated);
        assert_eq!(t.lip_sync_accuracy, 95);
    }

    #[tokio::test]
    async fn test_mock_report_serializes_camel_case() {
        let symbols = MockProvider::new()
            .symbols(Path::new("x.mp4"))
            .await
            .unwrap();
        let json = serde_json::to_value(&symbols).unwrap();
        assert!(json.get("detectedSymbols").is_some());
        assert!(json.get("riskAnalysis").is_some());
        assert!(json.get("symbolOccurrences").is_some());
    }
}
