//! Point-of-interest geometry: heat zones, hotspots, and simulated gaze.
//!
//! Heat zones are contiguous high-intensity regions of the accumulated
//! attention heatmap. Hotspots are the top-K intensity pixels, independent of
//! zone segmentation (a hotspot may fall inside a zone). Gaze points are
//! entirely synthetic: cluster centers over high-intensity pixels with
//! fabricated timestamps. There is no gaze sensor anywhere in this system,
//! which is why `GazeTrack` carries a mandatory `simulated: true` marker.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::PixelRect;

/// A contiguous region of the heatmap above the segmentation threshold.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatZone {
    /// Zone identifier (0-based, ordered by descending area).
    pub id: usize,
    /// Mean intensity over the zone, in the normalized 0-255 range.
    pub mean_intensity: f64,
    /// Pixel count of the zone.
    pub area_px: u64,
    /// Bounding rectangle in heatmap pixel coordinates.
    pub bounds: PixelRect,
    /// Centroid (x, y) in heatmap pixel coordinates.
    pub centroid: (f64, f64),
    /// Artificial timestamp: an even split of the video duration across the
    /// configured zone count, not a measured occurrence time.
    pub time: String,
}

/// A single top-intensity pixel location.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Hotspot identifier (0-based, ordered by descending intensity).
    pub id: usize,
    /// X coordinate in heatmap pixels.
    pub x: u32,
    /// Y coordinate in heatmap pixels.
    pub y: u32,
    /// Intensity at the pixel, in the normalized 0-255 range.
    pub intensity: f64,
    /// Artificial evenly-spaced timestamp, not a measured occurrence time.
    pub time: String,
}

/// One synthetic gaze point.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GazePoint {
    /// X coordinate in heatmap pixels.
    pub x: f64,
    /// Y coordinate in heatmap pixels.
    pub y: f64,
    /// Synthetic evenly-spaced timestamp.
    pub time: String,
    /// Fixed synthetic fixation duration in seconds.
    pub duration_secs: f64,
}

/// Simulated eye-tracking track.
///
/// The `simulated` flag is always `true` on the wire so API consumers cannot
/// mistake this for sensor data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GazeTrack {
    /// Always `true`: these points are derived from the heatmap, not measured.
    pub simulated: bool,
    /// Synthetic gaze points.
    pub points: Vec<GazePoint>,
}

impl GazeTrack {
    pub fn new(points: Vec<GazePoint>) -> Self {
        Self {
            simulated: true,
            points,
        }
    }
}

/// The POI section of the analysis report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoiAnalysis {
    /// Heatmap grid dimensions the coordinates below refer to.
    pub grid_width: u32,
    /// Heatmap grid height.
    pub grid_height: u32,
    /// Contiguous high-attention zones.
    pub heat_zones: Vec<HeatZone>,
    /// Top-intensity pixel locations.
    pub attention_hotspots: Vec<Hotspot>,
    /// Simulated eye-tracking data.
    pub eye_tracking: GazeTrack,
    /// Report labels.
    pub labels: Vec<String>,
}
