//! The real analysis provider: media sampling plus collaborator calls.
//!
//! Local work is limited to frame/audio extraction and the heatmap and
//! scene math; every recognition capability (classification, detection,
//! transcription, audio events, sentiment) goes through the injected
//! [`InferenceClient`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use vmod_media::{
    encode_detector_jpeg, extract_audio, probe_video, sample_gray_frames, GrayFrame,
    SampleConfig,
};
use vmod_models::timestamp::{format_range, format_time};
use vmod_models::{
    AnalysisReport, AudioAnalysis, KeyEvent, KeywordEntry, LanguageEntry, ObjectsAnalysis,
    OverallSentiment, PoiAnalysis, RiskAnalysis, RiskLevel, ScenesAnalysis, SentimentSegment,
    SubtitlesStatus, SummaryAnalysis, SymbolsAnalysis, Transcript, TranscriptionAnalysis,
    TranscriptionStatus,
};

use crate::error::AnalysisResult;
use crate::inference::InferenceClient;
use crate::poi::{analyze_poi, PoiConfig};
use crate::provider::{AiInsights, AnalysisProvider};
use crate::scenes::{analyze_scenes, SceneConfig};

/// Fixed lip-sync placeholder; no audiovisual alignment is measured.
const LIP_SYNC_ACCURACY: u32 = 95;

/// Per-symbol risk contribution; six symbols saturate the score.
const SYMBOL_RISK_STEP: f64 = 0.1;

/// Tuning for the real provider.
#[derive(Debug, Clone)]
pub struct RealProviderConfig {
    /// Frame sampling for the symbol and object passes.
    pub sample: SampleConfig,
    /// Width of the JPEG handed to the classifier and detector.
    pub detector_frame_width: u32,
    /// Minimum classifier confidence for a symbol to be reported.
    pub symbol_confidence: f64,
    /// Keyword extraction: minimum occurrences and word length.
    pub keyword_min_count: usize,
    pub keyword_min_len: usize,
    pub keyword_limit: usize,
    pub poi: PoiConfig,
    pub scenes: SceneConfig,
}

impl Default for RealProviderConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            detector_frame_width: 224,
            symbol_confidence: 0.5,
            keyword_min_count: 2,
            keyword_min_len: 5,
            keyword_limit: 10,
            poi: PoiConfig::default(),
            scenes: SceneConfig::default(),
        }
    }
}

/// Provider backed by FFmpeg sampling and an inference collaborator.
pub struct RealProvider {
    inference: Arc<dyn InferenceClient>,
    config: RealProviderConfig,
}

impl RealProvider {
    pub fn new(inference: Arc<dyn InferenceClient>, config: RealProviderConfig) -> Self {
        Self { inference, config }
    }

    async fn sampled_frames(&self, video: &Path) -> AnalysisResult<Vec<GrayFrame>> {
        Ok(sample_gray_frames(video, &self.config.sample).await?)
    }
}

fn tone_name(score: f64) -> &'static str {
    if score > 0.1 {
        "Positive"
    } else if score < -0.1 {
        "Negative"
    } else {
        "Neutral"
    }
}

/// Recurring-word extraction over the transcript text.
fn extract_keywords(text: &str, min_count: usize, min_len: usize, limit: usize) -> Vec<KeywordEntry> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() >= min_len {
            *counts.entry(word.to_lowercase()).or_insert(0) += 1;
        }
    }

    let mut keywords: Vec<KeywordEntry> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(word, count)| {
            let kind = if word.is_ascii() { "Recurring" } else { "Foreign" };
            KeywordEntry {
                word,
                count,
                kind: kind.to_string(),
            }
        })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    keywords.truncate(limit);
    keywords
}

/// Per-span sentiment over the transcript segments. A transcript without
/// segment timings is scored as one span covering the whole video.
async fn score_sentiment(
    inference: &dyn InferenceClient,
    transcript: &Transcript,
    duration_secs: f64,
) -> AnalysisResult<Vec<SentimentSegment>> {
    if transcript.segments.is_empty() {
        if transcript.text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value = inference.sentiment(&transcript.text).await?;
        return Ok(vec![SentimentSegment {
            name: format_range(0.0, duration_secs),
            value,
        }]);
    }

    let mut spans = Vec::with_capacity(transcript.segments.len());
    for segment in &transcript.segments {
        let value = inference.sentiment(&segment.text).await?;
        spans.push(SentimentSegment {
            name: format_range(segment.start, segment.end),
            value,
        });
    }
    Ok(spans)
}

#[async_trait]
impl AnalysisProvider for RealProvider {
    async fn transcription(&self, video: &Path) -> AnalysisResult<TranscriptionAnalysis> {
        let info = probe_video(video).await?;
        let audio = extract_audio(video).await?;
        let transcript = self.inference.transcribe(audio.path()).await?;
        debug!(chars = transcript.text.len(), "Transcript received");

        let sentiment_analysis =
            score_sentiment(self.inference.as_ref(), &transcript, info.duration).await?;
        let mean = if sentiment_analysis.is_empty() {
            0.0
        } else {
            sentiment_analysis.iter().map(|s| s.value).sum::<f64>()
                / sentiment_analysis.len() as f64
        };

        // Strongly negative spans get surfaced for manual review.
        let key_events = sentiment_analysis
            .iter()
            .filter(|span| span.value <= -0.5)
            .map(|span| KeyEvent {
                time: span.name.split(" - ").next().unwrap_or("00:00").to_string(),
                description: format!("Strongly negative speech ({:.2})", span.value),
                kind: Some("Moderation".to_string()),
            })
            .collect();

        let languages = vec![LanguageEntry {
            name: transcript
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            primary: true,
        }];
        let has_text = !transcript.text.trim().is_empty();

        Ok(TranscriptionAnalysis {
            generation_status: TranscriptionStatus {
                success: true,
                model: self.inference.asr_model().to_string(),
            },
            languages,
            lip_sync_accuracy: LIP_SYNC_ACCURACY,
            lip_sync_simulated: true,
            subtitles_status: SubtitlesStatus {
                created: has_text,
                synchronized: has_text,
            },
            key_events,
            sentiment_analysis,
            overall_sentiment: OverallSentiment {
                tone: tone_name(mean).to_string(),
                value: mean,
            },
            keyword_analysis: extract_keywords(
                &transcript.text,
                self.config.keyword_min_count,
                self.config.keyword_min_len,
                self.config.keyword_limit,
            ),
            text_labels: vec!["Transcription".to_string(), "AI-Analyzed".to_string()],
        })
    }

    async fn audio(&self, video: &Path) -> AnalysisResult<AudioAnalysis> {
        let info = probe_video(video).await?;
        let audio = extract_audio(video).await?;
        let result = self.inference.analyze_audio(audio.path()).await?;

        let features = result.features;
        let key_events = vec![
            KeyEvent {
                time: format_time(0.0),
                description: format!("Tempo: {:.2} BPM", features.tempo),
                kind: None,
            },
            KeyEvent {
                time: format_time(info.duration / 3.0),
                description: format!("Average pitch: {:.2} Hz", features.pitch_mean),
                kind: None,
            },
            KeyEvent {
                time: format_time(2.0 * info.duration / 3.0),
                description: format!("Loudness: {:.2} RMS", features.loudness),
                kind: None,
            },
        ];

        let sound_effects: Vec<String> =
            result.events.iter().map(|l| l.label.clone()).collect();
        let music_patterns: Vec<String> =
            result.moods.iter().map(|l| l.label.clone()).collect();

        let mut labels = vec!["Base".to_string(), "Audio-Analyzed".to_string()];
        labels.extend(sound_effects.iter().cloned());
        labels.extend(music_patterns.iter().cloned());

        Ok(AudioAnalysis {
            key_events,
            sound_effects,
            music_patterns,
            audio_features: features,
            labels,
        })
    }

    async fn symbols(&self, video: &Path) -> AnalysisResult<SymbolsAnalysis> {
        let frames = self.sampled_frames(video).await?;

        let mut detected = Vec::new();
        let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
        for frame in &frames {
            let jpeg = encode_detector_jpeg(frame, self.config.detector_frame_width)?;
            let labels = self.inference.classify_frame(&jpeg).await?;
            for label in labels {
                if label.confidence > self.config.symbol_confidence {
                    *occurrences.entry(label.label.clone()).or_insert(0) += 1;
                    detected.push(KeyEvent {
                        time: format_time(frame.time),
                        description: label.label,
                        kind: None,
                    });
                }
            }
        }

        let score = (SYMBOL_RISK_STEP * detected.len() as f64).min(1.0);
        info!(symbols = detected.len(), score, "Symbol pass complete");
        Ok(SymbolsAnalysis {
            detected_symbols: detected,
            risk_analysis: RiskAnalysis::from_score(score),
            symbol_occurrences: occurrences,
            labels: vec!["Symbols".to_string(), "AI-Analyzed".to_string()],
        })
    }

    async fn objects(&self, video: &Path) -> AnalysisResult<ObjectsAnalysis> {
        let frames = self.sampled_frames(video).await?;

        let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
        let mut key_objects: Vec<KeyEvent> = Vec::new();
        let mut interactions: Vec<KeyEvent> = Vec::new();
        for frame in &frames {
            let jpeg = encode_detector_jpeg(frame, self.config.detector_frame_width)?;
            let detections = self.inference.detect_objects(&jpeg).await?;

            let time = format_time(frame.time);
            for detection in &detections {
                let first = !occurrences.contains_key(&detection.label);
                *occurrences.entry(detection.label.clone()).or_insert(0) += 1;
                if first {
                    key_objects.push(KeyEvent {
                        time: time.clone(),
                        description: detection.label.clone(),
                        kind: None,
                    });
                }
            }
            for (i, a) in detections.iter().enumerate() {
                for b in &detections[i + 1..] {
                    if a.label != b.label && a.overlaps(b) {
                        interactions.push(KeyEvent {
                            time: time.clone(),
                            description: format!("{} near {}", a.label, b.label),
                            kind: None,
                        });
                    }
                }
            }
        }

        let object_categories: Vec<String> = occurrences.keys().cloned().collect();
        Ok(ObjectsAnalysis {
            object_categories,
            key_objects,
            object_occurrences: occurrences,
            object_interactions: interactions,
            labels: vec!["Objects".to_string(), "AI-Analyzed".to_string()],
        })
    }

    async fn poi(&self, video: &Path) -> AnalysisResult<PoiAnalysis> {
        analyze_poi(video, &self.config.poi).await
    }

    async fn scenes(&self, video: &Path) -> AnalysisResult<ScenesAnalysis> {
        let info = probe_video(video).await?;
        let frames = self.sampled_frames(video).await?;
        Ok(analyze_scenes(&frames, info.duration, &self.config.scenes))
    }

    async fn summary(
        &self,
        video: &Path,
        report: &AnalysisReport,
    ) -> AnalysisResult<SummaryAnalysis> {
        let info = probe_video(video).await?;

        let symbol_risk = report
            .symbols
            .as_ref()
            .map(|s| s.risk_analysis.overall_risk)
            .unwrap_or(0.0);
        let object_count = report
            .objects
            .as_ref()
            .map(|o| o.key_objects.len())
            .unwrap_or(0);
        let negative_tone = report
            .transcription
            .as_ref()
            .map(|t| t.overall_sentiment.tone == "Negative")
            .unwrap_or(false);

        let score = symbol_risk * 0.4
            + (SYMBOL_RISK_STEP * object_count as f64).min(1.0) * 0.3
            + if negative_tone { 0.3 } else { 0.0 };

        let overall_tone = report
            .transcription
            .as_ref()
            .map(|t| t.overall_sentiment.tone.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let mut key_moments = BTreeMap::new();
        if let Some(t) = &report.transcription {
            key_moments.insert(
                "transcription".to_string(),
                format!("{} key events", t.key_events.len()),
            );
        }
        if let Some(a) = &report.audio {
            key_moments.insert(
                "audio".to_string(),
                format!("{} notable sound effects", a.sound_effects.len()),
            );
        }
        if let Some(s) = &report.symbols {
            key_moments.insert(
                "symbols".to_string(),
                format!("{} detected symbols", s.detected_symbols.len()),
            );
        }
        if let Some(o) = &report.objects {
            key_moments.insert(
                "objects".to_string(),
                format!("{} key objects", o.key_objects.len()),
            );
        }
        if let Some(p) = &report.poi {
            key_moments.insert(
                "poi".to_string(),
                format!("{} heat zones", p.heat_zones.len()),
            );
        }
        if let Some(s) = &report.scenes {
            key_moments.insert(
                "scenes".to_string(),
                format!("{} scenes", s.scene_count),
            );
        }

        Ok(SummaryAnalysis {
            duration: format_time(info.duration),
            overall_tone,
            risk_level: RiskLevel::from_score(score),
            key_moments,
            labels: vec!["Base".to_string()],
        })
    }

    async fn insights(&self, _video: &Path) -> AnalysisResult<AiInsights> {
        Ok(AiInsights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::StaticInferenceClient;
    use vmod_models::SymbolsAnalysis;

    fn provider() -> RealProvider {
        RealProvider::new(
            Arc::new(StaticInferenceClient::default()),
            RealProviderConfig::default(),
        )
    }

    #[test]
    fn test_tone_name_thresholds() {
        assert_eq!(tone_name(0.5), "Positive");
        assert_eq!(tone_name(-0.5), "Negative");
        assert_eq!(tone_name(0.05), "Neutral");
        assert_eq!(tone_name(-0.1), "Neutral");
    }

    #[test]
    fn test_extract_keywords_counts_and_orders() {
        let text = "crypto crypto crypto market market short a a a";
        let keywords = extract_keywords(text, 2, 5, 10);
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].word, "crypto");
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].word, "market");
        assert_eq!(keywords[1].kind, "Recurring");
    }

    #[test]
    fn test_extract_keywords_ignores_short_and_rare_words() {
        let keywords = extract_keywords("once twice twice", 2, 5, 10);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].word, "twice");
    }

    #[test]
    fn test_symbol_risk_saturates() {
        assert!(((SYMBOL_RISK_STEP * 3.0_f64).min(1.0) - 0.3).abs() < 1e-9);
        assert!(((SYMBOL_RISK_STEP * 25.0_f64).min(1.0) - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_summary_aggregates_section_risk() {
        let provider = provider();
        let mut report = AnalysisReport::default();
        report.symbols = Some(SymbolsAnalysis {
            detected_symbols: vec![],
            risk_analysis: RiskAnalysis::from_score(1.0),
            symbol_occurrences: BTreeMap::new(),
            labels: vec![],
        });

        // probe fails on a missing file; exercise only the pure scoring here.
        let symbol_risk = report
            .symbols
            .as_ref()
            .map(|s| s.risk_analysis.overall_risk)
            .unwrap_or(0.0);
        assert_eq!(symbol_risk, 1.0);
        let score = symbol_risk * 0.4;
        assert_eq!(RiskLevel::from_score(score), RiskLevel::Medium);
        drop(provider);
    }

    #[tokio::test]
    async fn test_insights_are_placeholder() {
        let insights = provider().insights(Path::new("x.mp4")).await.unwrap();
        assert!(insights.placeholder);
    }
}
