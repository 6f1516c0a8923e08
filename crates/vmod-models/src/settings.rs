//! Per-request analysis settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which analysis categories to run for an uploaded video.
///
/// Parsed from the `settings` multipart part of `POST /api/analyze-video`.
/// Missing fields default to enabled; unknown fields are ignored so older
/// frontends keep working.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisSettings {
    pub summary: bool,
    pub transcription: bool,
    pub audio: bool,
    pub symbols: bool,
    pub objects: bool,
    pub poi: bool,
    pub scenes: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            summary: true,
            transcription: true,
            audio: true,
            symbols: true,
            objects: true,
            poi: true,
            scenes: true,
        }
    }
}

impl AnalysisSettings {
    /// True when no category is selected.
    pub fn is_empty(&self) -> bool {
        !(self.summary
            || self.transcription
            || self.audio
            || self.symbols
            || self.objects
            || self.poi
            || self.scenes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_all_on() {
        let s = AnalysisSettings::default();
        assert!(s.summary && s.transcription && s.audio);
        assert!(s.symbols && s.objects && s.poi && s.scenes);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: AnalysisSettings = serde_json::from_str(r#"{"poi": false}"#).unwrap();
        assert!(!s.poi);
        assert!(s.summary);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let s: AnalysisSettings =
            serde_json::from_str(r#"{"poi": true, "legacyFlag": 1}"#).unwrap();
        assert!(s.poi);
    }
}
