//! Seeded k-means over embedding vectors.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Assign each vector to one of `k` clusters.
///
/// Deterministic for a fixed seed: centroids start from distinct sampled
/// input points, rows are visited in order, and assignment ties resolve to
/// the lowest cluster id. `k` is clamped to the number of vectors, so a
/// partition smaller than `k` gets one cluster per row.
pub fn kmeans(data: &[Vec<f32>], k: usize, seed: u64, max_iterations: usize) -> Vec<usize> {
    if data.is_empty() {
        return Vec::new();
    }
    let k = k.clamp(1, data.len());

    let mut rng = StdRng::seed_from_u64(seed);
    let picks = rand::seq::index::sample(&mut rng, data.len(), k);
    let mut centroids: Vec<Vec<f32>> = picks.iter().map(|i| data[i].clone()).collect();

    let dim = data[0].len();
    let mut assignment = vec![0usize; data.len()];
    for _ in 0..max_iterations {
        let mut changed = false;
        for (row, vector) in data.iter().enumerate() {
            let nearest = nearest_centroid(vector, &centroids);
            if assignment[row] != nearest {
                assignment[row] = nearest;
                changed = true;
            }
        }

        // Recompute centroids; a cluster that lost every member keeps its
        // previous position.
        let mut sums = vec![vec![0.0f32; dim]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (row, vector) in data.iter().enumerate() {
            let c = assignment[row];
            counts[c] += 1;
            for (sum, value) in sums[c].iter_mut().zip(vector) {
                *sum += value;
            }
        }
        for (c, sum) in sums.into_iter().enumerate() {
            if counts[c] > 0 {
                centroids[c] = sum.into_iter().map(|s| s / counts[c] as f32).collect();
            }
        }

        if !changed {
            break;
        }
    }
    assignment
}

fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist: f32 = vector
            .iter()
            .zip(centroid)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        if dist < best_dist {
            best = c;
            best_dist = dist;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.0],
            vec![0.99, 0.05],
            vec![0.98, -0.05],
            vec![0.0, 1.0],
            vec![0.05, 0.99],
            vec![-0.05, 0.98],
        ]
    }

    #[test]
    fn test_separates_obvious_blobs() {
        let assignment = kmeans(&two_blobs(), 2, 42, 100);
        assert_eq!(assignment[0], assignment[1]);
        assert_eq!(assignment[1], assignment[2]);
        assert_eq!(assignment[3], assignment[4]);
        assert_eq!(assignment[4], assignment[5]);
        assert_ne!(assignment[0], assignment[3]);
    }

    #[test]
    fn test_same_seed_reproduces_assignment() {
        let data = two_blobs();
        let first = kmeans(&data, 2, 7, 100);
        let second = kmeans(&data, 2, 7, 100);
        assert_eq!(first, second);
    }

    #[test]
    fn test_k_is_clamped_to_row_count() {
        let data = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let assignment = kmeans(&data, 10, 42, 100);
        assert_eq!(assignment.len(), 2);
        assert!(assignment.iter().all(|&c| c < 2));
    }

    #[test]
    fn test_empty_input() {
        assert!(kmeans(&[], 10, 42, 100).is_empty());
    }
}
