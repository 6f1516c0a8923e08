//! Heat-zone extraction: Otsu thresholding plus connected components.

use serde::{Deserialize, Serialize};

use vmod_models::timestamp::format_time;
use vmod_models::{HeatZone, PixelRect};

use crate::heatmap::Heatmap;

/// Zone extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Target zone count. Fixed by configuration, not by the data.
    pub zone_count: usize,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self { zone_count: 3 }
    }
}

/// Extract the N largest contiguous above-threshold regions of the heatmap.
///
/// The threshold is computed with Otsu's between-class variance method over
/// the 0-255 intensity histogram. Each zone reports mean intensity, pixel
/// area, bounding box and centroid. The per-zone timestamp is an even split
/// of the total duration across the configured zone count (`i * duration / n`)
/// — a deliberate simplification, not a measured occurrence time.
///
/// Fewer than N components above the threshold yields however many exist;
/// an all-zero heatmap yields no zones.
pub fn extract_zones(
    heatmap: &Heatmap,
    frame_count: u64,
    fps: f64,
    config: &ZoneConfig,
) -> Vec<HeatZone> {
    if config.zone_count == 0 {
        return Vec::new();
    }

    let threshold = otsu_threshold(heatmap);
    let mask = binary_mask(heatmap, threshold);
    let mut components = connected_components(&mask, heatmap.width(), heatmap.height());
    tracing::debug!(
        threshold,
        components = components.len(),
        "Segmented heatmap into contiguous regions"
    );

    // N largest by area.
    components.sort_by(|a, b| b.pixels.len().cmp(&a.pixels.len()));
    components.truncate(config.zone_count);

    let duration = if fps > 0.0 { frame_count as f64 / fps } else { 0.0 };
    let n = config.zone_count as f64;

    components
        .into_iter()
        .enumerate()
        .map(|(i, component)| {
            let stats = component.stats(heatmap);
            HeatZone {
                id: i,
                mean_intensity: stats.mean_intensity,
                area_px: component.pixels.len() as u64,
                bounds: stats.bounds,
                centroid: stats.centroid,
                time: format_time(i as f64 * duration / n),
            }
        })
        .collect()
}

/// Otsu's automatic threshold over the 0-255 intensity histogram.
///
/// Returns the threshold value maximizing between-class variance. For a flat
/// (e.g. all-zero) histogram the threshold is 0.
pub fn otsu_threshold(heatmap: &Heatmap) -> f32 {
    let mut histogram = [0u64; 256];
    for &v in heatmap.grid().iter() {
        let bin = v.round().clamp(0.0, 255.0) as usize;
        histogram[bin] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut background_count = 0u64;
    let mut background_sum = 0.0;
    let mut best_variance = 0.0;
    let mut best_threshold = 0usize;

    for (t, &count) in histogram.iter().enumerate() {
        background_count += count;
        if background_count == 0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0 {
            break;
        }

        background_sum += t as f64 * count as f64;
        let mean_background = background_sum / background_count as f64;
        let mean_foreground = (weighted_sum - background_sum) / foreground_count as f64;

        let variance = background_count as f64
            * foreground_count as f64
            * (mean_background - mean_foreground).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = t;
        }
    }

    best_threshold as f32
}

fn binary_mask(heatmap: &Heatmap, threshold: f32) -> Vec<bool> {
    heatmap.grid().iter().map(|&v| v > threshold).collect()
}

/// One contiguous region of the binary mask.
struct Component {
    /// Member pixels as (x, y).
    pixels: Vec<(usize, usize)>,
}

struct ComponentStats {
    mean_intensity: f64,
    bounds: PixelRect,
    centroid: (f64, f64),
}

impl Component {
    fn stats(&self, heatmap: &Heatmap) -> ComponentStats {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        let mut sum_intensity = 0.0f64;
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;

        for &(x, y) in &self.pixels {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            sum_intensity += heatmap.get(x, y) as f64;
            sum_x += x as f64;
            sum_y += y as f64;
        }

        let count = self.pixels.len() as f64;
        ComponentStats {
            mean_intensity: sum_intensity / count,
            bounds: PixelRect::new(
                min_x as u32,
                min_y as u32,
                (max_x - min_x + 1) as u32,
                (max_y - min_y + 1) as u32,
            ),
            centroid: (sum_x / count, sum_y / count),
        }
    }
}

/// Label 4-connected components of the mask (iterative flood fill).
fn connected_components(mask: &[bool], width: usize, height: usize) -> Vec<Component> {
    let mut visited = vec![false; mask.len()];
    let mut components = Vec::new();

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }

        let mut pixels = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            pixels.push((x, y));

            let mut push = |nx: usize, ny: usize| {
                let nidx = ny * width + nx;
                if mask[nidx] && !visited[nidx] {
                    visited[nidx] = true;
                    stack.push(nidx);
                }
            };
            if x > 0 {
                push(x - 1, y);
            }
            if x + 1 < width {
                push(x + 1, y);
            }
            if y > 0 {
                push(x, y - 1);
            }
            if y + 1 < height {
                push(x, y + 1);
            }
        }

        components.push(Component { pixels });
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn bright_square(width: usize, height: usize, x0: usize, y0: usize, side: usize) -> Heatmap {
        let mut grid = Array2::<f32>::zeros((height, width));
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                grid[(y, x)] = 255.0;
            }
        }
        Heatmap::from_grid(grid).unwrap()
    }

    #[test]
    fn test_all_zero_heatmap_yields_no_zones() {
        let heatmap = Heatmap::zeros(32, 32).unwrap();
        let zones = extract_zones(&heatmap, 300, 30.0, &ZoneConfig::default());
        assert!(zones.is_empty());
    }

    #[test]
    fn test_single_bright_square_yields_one_exact_zone() {
        let heatmap = bright_square(64, 48, 10, 20, 8);
        let zones = extract_zones(&heatmap, 300, 30.0, &ZoneConfig::default());

        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        assert_eq!(zone.bounds, PixelRect::new(10, 20, 8, 8));
        assert_eq!(zone.area_px, 64);
        assert!((zone.mean_intensity - 255.0).abs() < 1e-3);
        assert!((zone.centroid.0 - 13.5).abs() < 1e-6);
        assert!((zone.centroid.1 - 23.5).abs() < 1e-6);
    }

    #[test]
    fn test_largest_n_zones_selected() {
        let mut grid = Array2::<f32>::zeros((40, 40));
        // Four squares of decreasing size, well separated.
        for (i, side) in [8usize, 6, 4, 2].iter().enumerate() {
            let x0 = i * 10;
            for y in 0..*side {
                for x in x0..x0 + side {
                    grid[(y + 20, x)] = 255.0;
                }
            }
        }
        let heatmap = Heatmap::from_grid(grid).unwrap();
        let zones = extract_zones(&heatmap, 600, 30.0, &ZoneConfig { zone_count: 3 });

        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].area_px, 64);
        assert_eq!(zones[1].area_px, 36);
        assert_eq!(zones[2].area_px, 16);
    }

    #[test]
    fn test_zone_timestamps_are_even_split() {
        let mut grid = Array2::<f32>::zeros((30, 30));
        for (i, x0) in [0usize, 10, 20].iter().enumerate() {
            for y in 0..3 + i {
                for x in *x0..*x0 + 3 + i {
                    grid[(y, x)] = 200.0;
                }
            }
        }
        let heatmap = Heatmap::from_grid(grid).unwrap();
        // 90 seconds of video split across 3 zones: 0s, 30s, 60s.
        let zones = extract_zones(&heatmap, 2700, 30.0, &ZoneConfig { zone_count: 3 });
        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].time, "00:00");
        assert_eq!(zones[1].time, "00:30");
        assert_eq!(zones[2].time, "01:00");
    }

    #[test]
    fn test_otsu_separates_bimodal_histogram() {
        // Dim background, bright square. The variance is flat between the
        // two modes and the first maximizer wins, so the cut lands on the
        // background intensity and `> threshold` keeps exactly the square.
        let mut grid = Array2::<f32>::from_elem((32, 32), 10.0);
        for y in 4..12 {
            for x in 4..12 {
                grid[(y, x)] = 255.0;
            }
        }
        let heatmap = Heatmap::from_grid(grid).unwrap();

        let threshold = otsu_threshold(&heatmap);
        assert!(threshold >= 10.0 && threshold < 255.0);
        let above = heatmap.grid().iter().filter(|&&v| v > threshold).count();
        assert_eq!(above, 64);
    }

    #[test]
    fn test_otsu_flat_histogram_is_zero() {
        let heatmap = Heatmap::zeros(16, 16).unwrap();
        assert_eq!(otsu_threshold(&heatmap), 0.0);
    }

    #[test]
    fn test_diagonal_pixels_are_separate_components() {
        // 4-connectivity: diagonal neighbors do not merge.
        let mut grid = Array2::<f32>::zeros((8, 8));
        grid[(1, 1)] = 255.0;
        grid[(2, 2)] = 255.0;
        let heatmap = Heatmap::from_grid(grid).unwrap();
        let zones = extract_zones(&heatmap, 100, 25.0, &ZoneConfig { zone_count: 5 });
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn test_zero_zone_count() {
        let heatmap = bright_square(16, 16, 2, 2, 4);
        assert!(extract_zones(&heatmap, 100, 25.0, &ZoneConfig { zone_count: 0 }).is_empty());
    }
}
