//! Outputs of the pretrained-model collaborators.
//!
//! All neural inference (classification, object detection, ASR, audio
//! emotion, sentiment) lives behind external collaborators that return the
//! types in this module. Nothing in this workspace runs a model itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A label/confidence pair from a classifier collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Label {
    /// Class label (e.g. ImageNet class, emotion name).
    pub label: String,
    /// Confidence in 0.0-1.0.
    pub confidence: f64,
}

impl Label {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A located detection from an object-detector collaborator.
///
/// Coordinates are normalized to 0.0-1.0 of the frame, matching the detector
/// wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Class label (e.g. COCO class).
    pub label: String,
    /// Confidence in 0.0-1.0.
    pub confidence: f64,
    /// Normalized left edge.
    pub x: f64,
    /// Normalized top edge.
    pub y: f64,
    /// Normalized width.
    pub width: f64,
    /// Normalized height.
    pub height: f64,
}

impl Detection {
    /// Check whether two detections overlap in the frame.
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Transcript from an ASR collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Full transcript text.
    pub text: String,
    /// Detected language name, if the model reported one.
    pub language: Option<String>,
    /// Timed segments.
    pub segments: Vec<TranscriptSegment>,
}

/// One timed segment of a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Segment text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_overlap() {
        let a = Detection {
            label: "person".into(),
            confidence: 0.9,
            x: 0.1,
            y: 0.1,
            width: 0.3,
            height: 0.3,
        };
        let mut b = a.clone();
        b.label = "car".into();
        b.x = 0.3;
        assert!(a.overlaps(&b));
        b.x = 0.5;
        assert!(!a.overlaps(&b));
    }
}
