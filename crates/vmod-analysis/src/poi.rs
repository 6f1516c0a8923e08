//! Point-of-interest analysis: attention heatmap, zones, hotspots, gaze.
//!
//! Attention is approximated by frame-to-frame luma change on the downscaled
//! analysis grid: regions that move accumulate energy, static regions do not.
//! The accumulated surface is normalized and smoothed, then segmented into
//! heat zones, reduced to top-intensity hotspots, and used to fabricate the
//! simulated gaze track.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use vmod_heatmap::{
    extract_hotspots, extract_zones, simulate_gaze, GazeConfig, Heatmap, HeatmapAccumulator,
    ZoneConfig,
};
use vmod_media::{probe_video, sample_gray_frames, GrayFrame, SampleConfig, VideoInfo};
use vmod_models::PoiAnalysis;

use crate::error::AnalysisResult;

/// Configuration for the POI pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiConfig {
    /// Frame sampling stride (one frame out of every `stride`).
    pub stride: u32,
    /// Analysis grid width; height follows the video aspect ratio.
    pub grid_width: u32,
    /// Heat-zone count.
    pub zone_count: usize,
    /// Hotspot count.
    pub hotspot_count: usize,
    /// Gaze point count.
    pub gaze_point_count: usize,
    /// Seed for the gaze clustering, so reports are reproducible.
    pub gaze_seed: u64,
}

impl Default for PoiConfig {
    fn default() -> Self {
        let sample = SampleConfig::default();
        Self {
            stride: sample.stride,
            grid_width: sample.width,
            zone_count: ZoneConfig::default().zone_count,
            hotspot_count: 5,
            gaze_point_count: GazeConfig::default().point_count,
            gaze_seed: 0,
        }
    }
}

/// Analysis-grid dimensions for a source video, mirroring the FFmpeg
/// `scale=W:-2` filter (width fixed, height snapped to the nearest even
/// value preserving aspect).
fn grid_dimensions(info: &VideoInfo, grid_width: u32) -> (usize, usize) {
    let width = grid_width.max(2);
    let height = if info.width > 0 {
        let scaled = info.height as f64 * width as f64 / info.width as f64;
        let even = ((scaled / 2.0).round() as u32 * 2).max(2);
        even
    } else {
        2
    };
    (width as usize, height as usize)
}

/// Per-frame energy: absolute luma difference against the previous sample.
fn frame_energy(prev: &GrayFrame, next: &GrayFrame) -> Array2<f32> {
    let (w, h) = (next.width as usize, next.height as usize);
    Array2::from_shape_fn((h, w), |(y, x)| {
        let a = prev.get(x as u32, y as u32) as f32;
        let b = next.get(x as u32, y as u32) as f32;
        (b - a).abs()
    })
}

/// Accumulate the attention heatmap for a set of sampled frames.
///
/// With fewer than two frames there is no motion signal and the result is
/// the zero grid at the declared dimensions.
pub fn accumulate_heatmap(
    frames: &[GrayFrame],
    width: usize,
    height: usize,
) -> AnalysisResult<Heatmap> {
    let mut accumulator = HeatmapAccumulator::new(width, height)?;
    for pair in frames.windows(2) {
        // Frames from one sampling pass share dimensions.
        accumulator.add_frame(&frame_energy(&pair[0], &pair[1]))?;
    }
    debug!(
        frames = frames.len(),
        energies = accumulator.frames_added(),
        "Accumulated attention energy"
    );

    // `finish` normalizes to [0, 255] and applies the fixed smoothing.
    Ok(accumulator.finish())
}

/// Derive the POI section from a finished heatmap.
pub fn poi_from_heatmap(
    heatmap: &Heatmap,
    frame_count: u64,
    fps: f64,
    config: &PoiConfig,
) -> PoiAnalysis {
    let duration = if fps > 0.0 {
        frame_count as f64 / fps
    } else {
        0.0
    };
    let zones = extract_zones(
        heatmap,
        frame_count,
        fps,
        &ZoneConfig {
            zone_count: config.zone_count,
        },
    );
    let hotspots = extract_hotspots(heatmap, duration, config.hotspot_count);
    let gaze = simulate_gaze(
        heatmap,
        duration,
        &GazeConfig {
            point_count: config.gaze_point_count,
            seed: config.gaze_seed,
        },
    );

    PoiAnalysis {
        grid_width: heatmap.width() as u32,
        grid_height: heatmap.height() as u32,
        heat_zones: zones,
        attention_hotspots: hotspots,
        eye_tracking: gaze,
        labels: vec!["Highlights".to_string(), "Base".to_string()],
    }
}

/// Full POI pipeline for one video file.
pub async fn analyze_poi(video: &Path, config: &PoiConfig) -> AnalysisResult<PoiAnalysis> {
    let info = probe_video(video).await?;
    let frames = sample_gray_frames(
        video,
        &SampleConfig {
            stride: config.stride,
            width: config.grid_width,
        },
    )
    .await?;

    // Actual frame dimensions win; the probe-derived fallback only matters
    // when sampling yields nothing (very short videos).
    let (width, height) = match frames.first() {
        Some(frame) => (frame.width as usize, frame.height as usize),
        None => grid_dimensions(&info, config.grid_width),
    };

    let heatmap = accumulate_heatmap(&frames, width, height)?;
    let analysis = poi_from_heatmap(&heatmap, info.frame_count(), info.fps, config);
    info!(
        zones = analysis.heat_zones.len(),
        hotspots = analysis.attention_hotspots.len(),
        gaze_points = analysis.eye_tracking.points.len(),
        "POI analysis complete"
    );
    Ok(analysis)
}
