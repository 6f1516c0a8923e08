//! The seam between this service and the pretrained-model collaborators.
//!
//! Object detection, frame classification, speech transcription, audio
//! feature/mood extraction and text sentiment all run in an external model
//! server. This module defines the [`InferenceClient`] trait plus the HTTP
//! implementation used in production and a static implementation for tests
//! and development.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vmod_models::{AudioFeatures, Detection, Label, Transcript};

use crate::error::{AnalysisError, AnalysisResult};

/// Combined output of the audio collaborators for one track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioInference {
    /// Scalar features (tempo, pitch, loudness, spectral means).
    pub features: AudioFeatures,
    /// Detected audio events (e.g. "Gunshot", "Siren") with confidence.
    pub events: Vec<Label>,
    /// Detected music moods/genres with confidence.
    pub moods: Vec<Label>,
}

/// Handle to the pretrained-model collaborators.
///
/// Implementations are injected into [`crate::RealProvider`]; nothing in this
/// workspace loads a model into process state.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Classify a frame (ImageNet-style symbol classification).
    async fn classify_frame(&self, jpeg: &[u8]) -> AnalysisResult<Vec<Label>>;

    /// Detect objects in a frame (COCO-style boxes).
    async fn detect_objects(&self, jpeg: &[u8]) -> AnalysisResult<Vec<Detection>>;

    /// Transcribe a 16 kHz mono WAV.
    async fn transcribe(&self, wav: &Path) -> AnalysisResult<Transcript>;

    /// Extract audio features, events and moods from a WAV.
    async fn analyze_audio(&self, wav: &Path) -> AnalysisResult<AudioInference>;

    /// Score sentiment of a text span in -1.0..1.0.
    async fn sentiment(&self, text: &str) -> AnalysisResult<f64>;

    /// Name of the ASR model behind [`transcribe`](Self::transcribe).
    fn asr_model(&self) -> &str;
}

// ============================================================================
// HTTP client
// ============================================================================

/// HTTP client for a model-server deployment.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    base_url: String,
    client: reqwest::Client,
    asr_model: String,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    detections: Vec<Detection>,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    score: f64,
}

impl HttpInferenceClient {
    /// Create a client for the given model-server base URL.
    pub fn new(base_url: impl Into<String>, asr_model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            asr_model: asr_model.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/v1/{}", self.base_url, endpoint)
    }

    async fn check(response: reqwest::Response) -> AnalysisResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AnalysisError::InferenceRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_image(&self, endpoint: &str, jpeg: &[u8]) -> AnalysisResult<reqwest::Response> {
        let part = reqwest::multipart::Part::bytes(jpeg.to_vec())
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| AnalysisError::internal(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn post_audio(&self, endpoint: &str, wav: &Path) -> AnalysisResult<reqwest::Response> {
        let bytes = tokio::fs::read(wav)
            .await
            .map_err(vmod_media::MediaError::from)?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| AnalysisError::internal(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn classify_frame(&self, jpeg: &[u8]) -> AnalysisResult<Vec<Label>> {
        let response = self.post_image("classify", jpeg).await?;
        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::response(e.to_string()))?;
        debug!(labels = parsed.labels.len(), "Frame classified");
        Ok(parsed.labels)
    }

    async fn detect_objects(&self, jpeg: &[u8]) -> AnalysisResult<Vec<Detection>> {
        let response = self.post_image("detect", jpeg).await?;
        let parsed: DetectResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::response(e.to_string()))?;
        Ok(parsed.detections)
    }

    async fn transcribe(&self, wav: &Path) -> AnalysisResult<Transcript> {
        let response = self.post_audio("transcribe", wav).await?;
        response
            .json()
            .await
            .map_err(|e| AnalysisError::response(e.to_string()))
    }

    async fn analyze_audio(&self, wav: &Path) -> AnalysisResult<AudioInference> {
        let response = self.post_audio("audio", wav).await?;
        response
            .json()
            .await
            .map_err(|e| AnalysisError::response(e.to_string()))
    }

    async fn sentiment(&self, text: &str) -> AnalysisResult<f64> {
        let response = self
            .client
            .post(self.url("sentiment"))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        let parsed: SentimentResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AnalysisError::response(e.to_string()))?;
        Ok(parsed.score.clamp(-1.0, 1.0))
    }

    fn asr_model(&self) -> &str {
        &self.asr_model
    }
}

// ============================================================================
// Static client
// ============================================================================

/// Fixed-output collaborator for tests and local development without a
/// model server.
#[derive(Debug, Clone)]
pub struct StaticInferenceClient {
    pub frame_labels: Vec<Label>,
    pub detections: Vec<Detection>,
    pub transcript: Transcript,
    pub audio: AudioInference,
    pub sentiment_score: f64,
}

impl Default for StaticInferenceClient {
    fn default() -> Self {
        Self {
            frame_labels: vec![Label::new("flag", 0.82)],
            detections: vec![Detection {
                label: "person".to_string(),
                confidence: 0.91,
                x: 0.4,
                y: 0.3,
                width: 0.2,
                height: 0.5,
            }],
            transcript: Transcript {
                text: "hello world hello again".to_string(),
                language: Some("English".to_string()),
                segments: vec![],
            },
            audio: AudioInference {
                features: AudioFeatures {
                    tempo: 120.0,
                    pitch_mean: 220.0,
                    loudness: 0.4,
                    mel_spec_mean: -32.0,
                    chroma_mean: 0.5,
                },
                events: vec![Label::new("Applause", 0.7)],
                moods: vec![Label::new("Electronic", 0.6)],
            },
            sentiment_score: 0.5,
        }
    }
}

#[async_trait]
impl InferenceClient for StaticInferenceClient {
    async fn classify_frame(&self, _jpeg: &[u8]) -> AnalysisResult<Vec<Label>> {
        Ok(self.frame_labels.clone())
    }

    async fn detect_objects(&self, _jpeg: &[u8]) -> AnalysisResult<Vec<Detection>> {
        Ok(self.detections.clone())
    }

    async fn transcribe(&self, _wav: &Path) -> AnalysisResult<Transcript> {
        Ok(self.transcript.clone())
    }

    async fn analyze_audio(&self, _wav: &Path) -> AnalysisResult<AudioInference> {
        Ok(self.audio.clone())
    }

    async fn sentiment(&self, _text: &str) -> AnalysisResult<f64> {
        Ok(self.sentiment_score)
    }

    fn asr_model(&self) -> &str {
        "static-fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_classify_frame_parses_labels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/classify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "labels": [{"label": "rifle", "confidence": 0.87}]
            })))
            .mount(&server)
            .await;

        let client = HttpInferenceClient::new(server.uri(), "whisper-base");
        let labels = client.classify_frame(b"\xff\xd8fake").await.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label, "rifle");
    }

    #[tokio::test]
    async fn test_sentiment_clamps_score() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sentiment"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"score": 3.2})),
            )
            .mount(&server)
            .await;

        let client = HttpInferenceClient::new(server.uri(), "whisper-base");
        let score = client.sentiment("great video").await.unwrap();
        assert_eq!(score, 1.0);
    }

    #[tokio::test]
    async fn test_server_error_is_rejected_not_masked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/classify"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let client = HttpInferenceClient::new(server.uri(), "whisper-base");
        let err = client.classify_frame(b"img").await.unwrap_err();
        match err {
            AnalysisError::InferenceRejected { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model loading");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/classify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpInferenceClient::new(server.uri(), "whisper-base");
        let err = client.classify_frame(b"img").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InferenceResponse(_)));
    }
}
