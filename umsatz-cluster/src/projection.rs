//! 2-D projection of embedding vectors for visual exploration.

use tracing::debug;

/// Requested neighborhood size before clamping.
pub const DEFAULT_PERPLEXITY: f32 = 30.0;
/// Gradient-descent epochs for the exact t-SNE run.
const EPOCHS: usize = 1000;
/// Below this many vectors a neighborhood is meaningless; use a fixed layout.
const MIN_SAMPLES: usize = 5;
const PERPLEXITY_FLOOR: f32 = 1.0;

/// Keep perplexity valid for small inputs.
///
/// t-SNE needs `3 * perplexity` strictly below the sample count, so small
/// partitions pull the requested value down rather than failing.
fn clamp_perplexity(requested: f32, samples: usize) -> f32 {
    let cap = (samples as f32 - 1.0) / 3.0 - 0.01;
    requested.min(cap).max(PERPLEXITY_FLOOR)
}

/// Project unit vectors to 2-D with exact t-SNE under cosine distance.
///
/// Partitions too small to project get a deterministic line layout instead
/// of invoking the projection. Coordinates are only statistically
/// reproducible across runs; cluster membership, not geometry, is the
/// stable contract.
pub fn project_2d(vectors: &[Vec<f32>], perplexity: f32) -> Vec<(f32, f32)> {
    if vectors.is_empty() {
        return Vec::new();
    }
    if vectors.len() < MIN_SAMPLES {
        return (0..vectors.len()).map(|i| (i as f32, 0.0)).collect();
    }

    let perplexity = clamp_perplexity(perplexity, vectors.len());
    debug!(
        "projecting {} vectors at perplexity {}",
        vectors.len(),
        perplexity
    );

    let samples: Vec<&[f32]> = vectors.iter().map(|v| v.as_slice()).collect();
    let mut tsne = bhtsne::tSNE::new(&samples);
    tsne.embedding_dim(2)
        .perplexity(perplexity)
        .epochs(EPOCHS)
        .exact(|a: &&[f32], b: &&[f32]| cosine_distance(a, b));
    let flat = tsne.embedding();
    flat.chunks(2).map(|xy| (xy[0], xy[1])).collect()
}

/// Cosine distance; inputs are unit length, so this is `1 - dot`.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (1.0 - dot).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perplexity_clamp() {
        // Large partitions keep the requested value.
        assert_eq!(clamp_perplexity(30.0, 1000), 30.0);
        // Small partitions pull 3 * perplexity strictly below n - 1.
        for n in MIN_SAMPLES..20 {
            let clamped = clamp_perplexity(30.0, n);
            assert!(clamped * 3.0 < (n - 1) as f32, "n = {n}");
            assert!(clamped >= PERPLEXITY_FLOOR);
        }
    }

    #[test]
    fn test_tiny_partition_uses_fallback_layout() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let projected = project_2d(&vectors, DEFAULT_PERPLEXITY);
        assert_eq!(projected, vec![(0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(project_2d(&[], DEFAULT_PERPLEXITY).is_empty());
    }

    #[test]
    fn test_small_partition_projects_without_panicking() {
        // Fewer than 10 distinct rows must still project.
        let vectors: Vec<Vec<f32>> = (0..6)
            .map(|i| {
                let angle = i as f32;
                vec![angle.cos(), angle.sin()]
            })
            .collect();
        let projected = project_2d(&vectors, DEFAULT_PERPLEXITY);
        assert_eq!(projected.len(), 6);
        assert!(projected.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }
}
