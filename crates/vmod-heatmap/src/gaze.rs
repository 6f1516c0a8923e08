//! Simulated gaze-point generation.
//!
//! There is no gaze sensor anywhere in this pipeline. The "eye-tracking"
//! output is fabricated from the attention heatmap: high-intensity pixel
//! locations are clustered into a fixed number of representative points and
//! given evenly spaced synthetic timestamps. The result is wrapped in
//! [`GazeTrack`] whose `simulated` flag is always `true` on the wire.

use serde::{Deserialize, Serialize};

use vmod_models::timestamp::format_time;
use vmod_models::{GazePoint, GazeTrack};

use crate::cluster::kmeans;
use crate::heatmap::Heatmap;

/// Intensity percentile above which pixels count as "high attention".
const INTENSITY_PERCENTILE: f64 = 0.90;

/// Lloyd iterations for the gaze k-means.
const KMEANS_ITERS: usize = 25;

/// Gaze simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazeConfig {
    /// Target point count. Fixed by configuration, not by the data.
    pub point_count: usize,
    /// Seed for the clustering step, so reports are reproducible.
    pub seed: u64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            point_count: 100,
            seed: 0,
        }
    }
}

/// Fabricate a gaze track from the heatmap.
///
/// Selects all pixels strictly above the 90th intensity percentile. If more
/// than `point_count` qualify they are k-means clustered down to
/// `point_count` centers; otherwise the raw pixel locations are used, so the
/// output never exceeds `min(point_count, qualifying pixels)`. Each point
/// gets an evenly spaced synthetic timestamp and a fixed duration of
/// `duration / point_count` seconds.
pub fn simulate_gaze(heatmap: &Heatmap, duration_secs: f64, config: &GazeConfig) -> GazeTrack {
    if config.point_count == 0 {
        return GazeTrack::new(Vec::new());
    }

    let cutoff = intensity_percentile(heatmap, INTENSITY_PERCENTILE);
    let mut candidates: Vec<[f32; 2]> = Vec::new();
    for y in 0..heatmap.height() {
        for x in 0..heatmap.width() {
            if heatmap.get(x, y) > cutoff {
                candidates.push([x as f32, y as f32]);
            }
        }
    }

    let locations: Vec<[f32; 2]> = if candidates.len() > config.point_count {
        kmeans(&candidates, config.point_count, KMEANS_ITERS, config.seed).0
    } else {
        candidates
    };

    let fixation_secs = duration_secs / config.point_count as f64;
    let spacing = if locations.is_empty() {
        0.0
    } else {
        duration_secs / locations.len() as f64
    };

    let points = locations
        .into_iter()
        .enumerate()
        .map(|(i, [x, y])| GazePoint {
            x: x as f64,
            y: y as f64,
            time: format_time(i as f64 * spacing),
            duration_secs: fixation_secs,
        })
        .collect();

    GazeTrack::new(points)
}

/// Value at the given percentile of the intensity distribution.
fn intensity_percentile(heatmap: &Heatmap, percentile: f64) -> f32 {
    let mut values: Vec<f32> = heatmap.grid().iter().copied().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = ((values.len() - 1) as f64 * percentile).round() as usize;
    values[rank]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn heatmap_with_bright_pixels(count: usize) -> Heatmap {
        let mut grid = Array2::<f32>::zeros((32, 32));
        for i in 0..count {
            grid[(i / 32, i % 32)] = 255.0;
        }
        Heatmap::from_grid(grid).unwrap()
    }

    #[test]
    fn test_all_zero_heatmap_yields_no_points() {
        let heatmap = Heatmap::zeros(32, 32).unwrap();
        let track = simulate_gaze(&heatmap, 60.0, &GazeConfig::default());
        assert!(track.simulated);
        assert!(track.points.is_empty());
    }

    #[test]
    fn test_point_count_capped_by_candidates() {
        // 12 bright pixels, 100 requested: the raw pixel set is used.
        let heatmap = heatmap_with_bright_pixels(12);
        let track = simulate_gaze(&heatmap, 60.0, &GazeConfig::default());
        assert_eq!(track.points.len(), 12);
    }

    #[test]
    fn test_point_count_capped_by_config() {
        // More qualifying pixels than requested points: clustered down to P.
        let heatmap = heatmap_with_bright_pixels(90);
        let config = GazeConfig {
            point_count: 10,
            seed: 3,
        };
        let track = simulate_gaze(&heatmap, 60.0, &config);
        assert_eq!(track.points.len(), 10);
    }

    #[test]
    fn test_never_exceeds_min_of_p_and_candidates() {
        for bright in [0usize, 5, 50, 200] {
            let heatmap = heatmap_with_bright_pixels(bright);
            let config = GazeConfig {
                point_count: 40,
                seed: 1,
            };
            let track = simulate_gaze(&heatmap, 30.0, &config);
            assert!(track.points.len() <= 40.min(bright));
        }
    }

    #[test]
    fn test_points_within_grid_bounds() {
        let heatmap = heatmap_with_bright_pixels(100);
        let track = simulate_gaze(&heatmap, 60.0, &GazeConfig::default());
        for p in &track.points {
            assert!(p.x >= 0.0 && p.x < 32.0);
            assert!(p.y >= 0.0 && p.y < 32.0);
        }
    }

    #[test]
    fn test_fixed_fixation_duration() {
        let heatmap = heatmap_with_bright_pixels(30);
        let config = GazeConfig {
            point_count: 20,
            seed: 0,
        };
        let track = simulate_gaze(&heatmap, 100.0, &config);
        for p in &track.points {
            assert!((p.duration_secs - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let heatmap = heatmap_with_bright_pixels(100);
        let config = GazeConfig {
            point_count: 16,
            seed: 99,
        };
        let a = simulate_gaze(&heatmap, 45.0, &config);
        let b = simulate_gaze(&heatmap, 45.0, &config);
        let coords = |t: &GazeTrack| t.points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
        assert_eq!(coords(&a), coords(&b));
    }
}
