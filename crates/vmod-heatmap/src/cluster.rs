//! Small fixed-dimension k-means used by gaze simulation and scene typing.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

/// K-means over fixed-dimension points with seeded initialization.
///
/// Centers are initialized from a random sample of the input (Forgy), then
/// refined with Lloyd iterations until assignments stabilize or `max_iters`
/// is reached. Returns the cluster centers and the per-point assignment.
/// `k >= points.len()` degenerates to one center per point.
pub fn kmeans<const D: usize>(
    points: &[[f32; D]],
    k: usize,
    max_iters: usize,
    seed: u64,
) -> (Vec<[f32; D]>, Vec<usize>) {
    if points.is_empty() || k == 0 {
        return (Vec::new(), Vec::new());
    }
    if k >= points.len() {
        return (points.to_vec(), (0..points.len()).collect());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centers: Vec<[f32; D]> = sample(&mut rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect();
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..max_iters {
        let mut changed = false;

        for (i, point) in points.iter().enumerate() {
            let nearest = nearest_center(point, &centers);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0.0f32; D]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(&assignments) {
            counts[cluster] += 1;
            for d in 0..D {
                sums[cluster][d] += point[d];
            }
        }
        for (cluster, center) in centers.iter_mut().enumerate() {
            // Empty clusters keep their previous center.
            if counts[cluster] > 0 {
                for d in 0..D {
                    center[d] = sums[cluster][d] / counts[cluster] as f32;
                }
            }
        }

        if !changed {
            break;
        }
    }

    (centers, assignments)
}

fn nearest_center<const D: usize>(point: &[f32; D], centers: &[[f32; D]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let mut dist = 0.0;
        for d in 0..D {
            let diff = point[d] - center[d];
            dist += diff * diff;
        }
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_well_separated_clusters() {
        let mut points = Vec::new();
        for i in 0..10 {
            points.push([i as f32 * 0.1, 0.0]);
            points.push([100.0 + i as f32 * 0.1, 0.0]);
        }
        let (centers, assignments) = kmeans(&points, 2, 50, 42);
        assert_eq!(centers.len(), 2);
        assert_eq!(assignments.len(), points.len());

        // Points from the same group land in the same cluster.
        let first = assignments[0];
        for pair in assignments.chunks(2) {
            assert_eq!(pair[0], first);
            assert_ne!(pair[1], first);
        }
    }

    #[test]
    fn test_k_at_least_point_count_is_identity() {
        let points = vec![[1.0f32, 2.0], [3.0, 4.0]];
        let (centers, assignments) = kmeans(&points, 5, 10, 0);
        assert_eq!(centers, points);
        assert_eq!(assignments, vec![0, 1]);
    }

    #[test]
    fn test_seed_determinism() {
        let points: Vec<[f32; 2]> = (0..40).map(|i| [(i * 7 % 13) as f32, (i % 5) as f32]).collect();
        let a = kmeans(&points, 4, 30, 7);
        let b = kmeans(&points, 4, 30, 7);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_empty_inputs() {
        let points: Vec<[f32; 2]> = Vec::new();
        assert!(kmeans(&points, 3, 10, 0).0.is_empty());
        let points = vec![[0.0f32, 0.0]];
        assert!(kmeans(&points, 0, 10, 0).0.is_empty());
    }
}
