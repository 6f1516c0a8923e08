//! Scene segmentation by luma-histogram clustering.
//!
//! Each sampled frame is reduced to a normalized 16-bin luma histogram, the
//! histograms are clustered with k-means (k = 4), and consecutive frames in
//! the same cluster are stitched into scene spans. Cluster indices map to
//! fixed scene-type names; the clustering is unsupervised, so the names
//! describe buckets of visually similar footage rather than semantics.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vmod_heatmap::kmeans;
use vmod_media::GrayFrame;
use vmod_models::timestamp::format_range;
use vmod_models::{SceneSpan, ScenesAnalysis};

/// Histogram bins per frame.
const HISTOGRAM_BINS: usize = 16;

/// Lloyd iterations for the scene clustering.
const KMEANS_ITERS: usize = 50;

/// Scene-type names by cluster index.
const SCENE_TYPES: [&str; 4] = ["Action", "Dialogue", "Scenery", "Montage"];

/// Scene clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Cluster count. Capped by the number of sampled frames.
    pub cluster_count: usize,
    /// Seed for the clustering step, so reports are reproducible.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cluster_count: SCENE_TYPES.len(),
            seed: 0,
        }
    }
}

/// Normalized luma histogram of one frame.
fn frame_histogram(frame: &GrayFrame) -> [f32; HISTOGRAM_BINS] {
    let mut histogram = [0f32; HISTOGRAM_BINS];
    for &value in &frame.luma {
        histogram[value as usize * HISTOGRAM_BINS / 256] += 1.0;
    }
    let total = frame.luma.len() as f32;
    if total > 0.0 {
        for bin in &mut histogram {
            *bin /= total;
        }
    }
    histogram
}

/// A stitched run of consecutive same-cluster frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRun {
    /// Cluster index of the run.
    pub cluster: usize,
    /// Start time of the first frame in seconds.
    pub start_secs: f64,
    /// End time in seconds (start of the frame after the run, or the video
    /// end for the final run).
    pub end_secs: f64,
}

/// Stitch per-frame cluster assignments into contiguous runs.
pub fn stitch_runs(assignments: &[usize], times: &[f64], duration_secs: f64) -> Vec<SceneRun> {
    let mut runs: Vec<SceneRun> = Vec::new();
    for (i, &cluster) in assignments.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.cluster == cluster => {}
            _ => runs.push(SceneRun {
                cluster,
                start_secs: times[i],
                end_secs: times[i],
            }),
        }
    }
    // Close each run at the start of the next, the last at the video end.
    let starts: Vec<f64> = runs.iter().map(|r| r.start_secs).collect();
    for (i, run) in runs.iter_mut().enumerate() {
        run.end_secs = starts.get(i + 1).copied().unwrap_or(duration_secs);
    }
    runs
}

/// Cluster sampled frames into scenes.
pub fn analyze_scenes(
    frames: &[GrayFrame],
    duration_secs: f64,
    config: &SceneConfig,
) -> ScenesAnalysis {
    let scene_types: Vec<String> = SCENE_TYPES.iter().map(|s| s.to_string()).collect();
    if frames.is_empty() {
        return ScenesAnalysis {
            scene_count: 0,
            average_scene_duration: 0.0,
            scene_types,
            key_scenes: Vec::new(),
            labels: Vec::new(),
        };
    }

    let histograms: Vec<[f32; HISTOGRAM_BINS]> = frames.iter().map(frame_histogram).collect();
    let (_, assignments) = kmeans(
        &histograms,
        config.cluster_count.min(frames.len()),
        KMEANS_ITERS,
        config.seed,
    );

    let times: Vec<f64> = frames.iter().map(|f| f.time).collect();
    let runs = stitch_runs(&assignments, &times, duration_secs);
    debug!(frames = frames.len(), scenes = runs.len(), "Stitched scene runs");

    let total: f64 = runs.iter().map(|r| r.end_secs - r.start_secs).sum();
    let average = total / runs.len() as f64;

    let key_scenes = runs
        .iter()
        .map(|run| SceneSpan {
            time: format_range(run.start_secs, run.end_secs),
            scene_type: SCENE_TYPES[run.cluster % SCENE_TYPES.len()].to_string(),
        })
        .collect();

    ScenesAnalysis {
        scene_count: runs.len(),
        average_scene_duration: average,
        scene_types,
        key_scenes,
        labels: vec!["Highlights".to_string(), "Base".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, time: f64, fill: u8) -> GrayFrame {
        GrayFrame {
            index,
            time,
            width: 8,
            height: 8,
            luma: vec![fill; 64],
        }
    }

    #[test]
    fn test_histogram_is_normalized() {
        let histogram = frame_histogram(&frame(0, 0.0, 130));
        let sum: f32 = histogram.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // 130 * 16 / 256 = 8
        assert_eq!(histogram[8], 1.0);
    }

    #[test]
    fn test_stitch_runs_merges_consecutive() {
        let assignments = [0, 0, 1, 1, 1, 0];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let runs = stitch_runs(&assignments, &times, 6.0);

        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0], SceneRun { cluster: 0, start_secs: 0.0, end_secs: 2.0 });
        assert_eq!(runs[1], SceneRun { cluster: 1, start_secs: 2.0, end_secs: 5.0 });
        assert_eq!(runs[2], SceneRun { cluster: 0, start_secs: 5.0, end_secs: 6.0 });
    }

    #[test]
    fn test_no_frames_yields_empty_analysis() {
        let analysis = analyze_scenes(&[], 0.0, &SceneConfig::default());
        assert_eq!(analysis.scene_count, 0);
        assert!(analysis.key_scenes.is_empty());
        assert_eq!(analysis.average_scene_duration, 0.0);
    }

    #[test]
    fn test_distinct_footage_splits_into_scenes() {
        // Two visually distinct halves: dark then bright.
        let frames: Vec<GrayFrame> = (0..6)
            .map(|i| frame(i, i as f64, if i < 3 { 10 } else { 240 }))
            .collect();
        let analysis = analyze_scenes(&frames, 6.0, &SceneConfig::default());

        assert!(analysis.scene_count >= 2);
        assert_eq!(analysis.key_scenes.len(), analysis.scene_count);
        assert_eq!(analysis.key_scenes[0].time, "00:00 - 00:03");
        // Average duration covers the whole video.
        let total = analysis.average_scene_duration * analysis.scene_count as f64;
        assert!((total - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_footage_is_one_scene() {
        let frames: Vec<GrayFrame> = (0..5).map(|i| frame(i, i as f64 * 2.0, 128)).collect();
        let analysis = analyze_scenes(&frames, 10.0, &SceneConfig::default());

        assert_eq!(analysis.scene_count, 1);
        assert_eq!(analysis.key_scenes[0].time, "00:00 - 00:10");
        assert_eq!(analysis.average_scene_duration, 10.0);
    }
}
