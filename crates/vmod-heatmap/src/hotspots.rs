//! Hotspot extraction: the top-K intensity pixels of the heatmap.

use vmod_models::timestamp::format_time;
use vmod_models::Hotspot;

use crate::heatmap::Heatmap;

/// Extract the M highest-intensity pixel locations.
///
/// Hotspots are independent of zone segmentation — no deduplication is done,
/// so a hotspot may fall inside a heat zone. Each hotspot gets an artificial
/// evenly-spaced timestamp across the video duration, in the same spirit as
/// zone timestamps. An all-zero heatmap yields M degenerate hotspots at
/// (0, 0) with intensity 0.
pub fn extract_hotspots(heatmap: &Heatmap, duration_secs: f64, count: usize) -> Vec<Hotspot> {
    if count == 0 {
        return Vec::new();
    }

    let spacing = duration_secs / count as f64;

    if heatmap.max_intensity() <= 0.0 {
        return (0..count)
            .map(|i| Hotspot {
                id: i,
                x: 0,
                y: 0,
                intensity: 0.0,
                time: format_time(i as f64 * spacing),
            })
            .collect();
    }

    let width = heatmap.width();
    let mut indexed: Vec<(f32, usize)> = heatmap
        .grid()
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, v)| (v, idx))
        .collect();

    // Descending intensity, flat index as tiebreaker for determinism.
    indexed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
    indexed.truncate(count);

    indexed
        .into_iter()
        .enumerate()
        .map(|(i, (intensity, idx))| Hotspot {
            id: i,
            x: (idx % width) as u32,
            y: (idx / width) as u32,
            intensity: intensity as f64,
            time: format_time(i as f64 * spacing),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_all_zero_heatmap_gives_origin_hotspots() {
        let heatmap = Heatmap::zeros(16, 16).unwrap();
        let hotspots = extract_hotspots(&heatmap, 60.0, 5);
        assert_eq!(hotspots.len(), 5);
        for spot in &hotspots {
            assert_eq!((spot.x, spot.y), (0, 0));
            assert_eq!(spot.intensity, 0.0);
        }
    }

    #[test]
    fn test_top_pixels_selected_in_order() {
        let mut grid = Array2::<f32>::zeros((10, 12));
        grid[(3, 4)] = 250.0;
        grid[(7, 9)] = 200.0;
        grid[(0, 0)] = 150.0;
        let heatmap = Heatmap::from_grid(grid).unwrap();

        let hotspots = extract_hotspots(&heatmap, 30.0, 3);
        assert_eq!(hotspots.len(), 3);
        assert_eq!((hotspots[0].x, hotspots[0].y), (4, 3));
        assert_eq!((hotspots[1].x, hotspots[1].y), (9, 7));
        assert_eq!((hotspots[2].x, hotspots[2].y), (0, 0));
        assert!(hotspots[0].intensity > hotspots[1].intensity);
    }

    #[test]
    fn test_coordinates_within_bounds_for_odd_shapes() {
        for (w, h) in [(1usize, 1usize), (3, 7), (17, 5), (64, 2)] {
            let mut grid = Array2::<f32>::zeros((h, w));
            for (i, v) in grid.iter_mut().enumerate() {
                *v = (i % 13) as f32;
            }
            let heatmap = Heatmap::from_grid(grid).unwrap();
            for spot in extract_hotspots(&heatmap, 10.0, 5) {
                assert!((spot.x as usize) < w);
                assert!((spot.y as usize) < h);
            }
        }
    }

    #[test]
    fn test_timestamps_evenly_spaced() {
        let mut grid = Array2::<f32>::zeros((4, 4));
        grid[(0, 0)] = 10.0;
        let heatmap = Heatmap::from_grid(grid).unwrap();
        let hotspots = extract_hotspots(&heatmap, 100.0, 5);
        assert_eq!(hotspots[0].time, "00:00");
        assert_eq!(hotspots[1].time, "00:20");
        assert_eq!(hotspots[4].time, "01:20");
    }

    #[test]
    fn test_count_is_configuration_driven() {
        // More hotspots requested than bright pixels: dark pixels fill in.
        let mut grid = Array2::<f32>::zeros((3, 3));
        grid[(1, 1)] = 99.0;
        let heatmap = Heatmap::from_grid(grid).unwrap();
        assert_eq!(extract_hotspots(&heatmap, 10.0, 5).len(), 5);
        assert_eq!(extract_hotspots(&heatmap, 10.0, 0).len(), 0);
    }
}
