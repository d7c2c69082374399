//! Detail clustering: embed descriptions, cluster, project, aggregate.
//!
//! Spending and income are clustered separately so a salary line never
//! lands in the middle of a groceries cluster. Amounts in the spending
//! partition are flipped to positive magnitudes before aggregation.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::debug;

use umsatz_core::Transaction;

use crate::embedder::Embedder;
use crate::kmeans::kmeans;
use crate::projection::{DEFAULT_PERPLEXITY, project_2d};

/// Pipeline tuning knobs. The defaults match the dashboard's fixed
/// settings; the seed keeps cluster assignment reproducible run to run.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// k-means cluster count, clamped to the partition size.
    pub clusters: usize,
    /// Seed for centroid initialization.
    pub seed: u64,
    /// Requested t-SNE perplexity before clamping.
    pub perplexity: f32,
    /// k-means iteration cap.
    pub max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            clusters: 10,
            seed: 42,
            perplexity: DEFAULT_PERPLEXITY,
            max_iterations: 100,
        }
    }
}

/// One (details, cluster) aggregate row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAggregate {
    pub details: String,
    pub cluster: usize,
    /// Summed magnitude over every row with this description and cluster.
    pub total_amount: f64,
    /// Mean 2-D projection coordinates.
    pub x: f32,
    pub y: f32,
}

/// Cluster aggregates for the spending and income halves of a table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterPartitions {
    pub spending: Vec<ClusterAggregate>,
    pub income: Vec<ClusterAggregate>,
}

/// Run the full pipeline over `rows`, spending and income separately.
pub fn cluster_details(
    rows: &[Transaction],
    embedder: &dyn Embedder,
    config: &ClusterConfig,
) -> Result<ClusterPartitions> {
    let spending: Vec<(String, f64)> = rows
        .iter()
        .filter(|r| r.is_spending())
        .map(|r| (r.details.clone(), r.abs_amount()))
        .collect();
    let income: Vec<(String, f64)> = rows
        .iter()
        .filter(|r| r.is_income())
        .map(|r| (r.details.clone(), r.amount))
        .collect();

    Ok(ClusterPartitions {
        spending: cluster_partition(&spending, embedder, config)?,
        income: cluster_partition(&income, embedder, config)?,
    })
}

fn cluster_partition(
    rows: &[(String, f64)],
    embedder: &dyn Embedder,
    config: &ClusterConfig,
) -> Result<Vec<ClusterAggregate>> {
    if rows.is_empty() {
        // Short-circuit: the embedding model is never invoked for nothing.
        return Ok(Vec::new());
    }

    let texts: Vec<String> = rows.iter().map(|(details, _)| details.clone()).collect();
    let mut vectors = embedder.embed(&texts)?;
    if vectors.len() != rows.len() {
        bail!(
            "embedder returned {} vectors for {} rows",
            vectors.len(),
            rows.len()
        );
    }
    for vector in &mut vectors {
        normalize(vector);
    }

    let assignment = kmeans(&vectors, config.clusters, config.seed, config.max_iterations);
    let projected = project_2d(&vectors, config.perplexity);

    // Aggregate by (details, cluster): sum amounts, average coordinates.
    let mut buckets: BTreeMap<(String, usize), (f64, f32, f32, usize)> = BTreeMap::new();
    for (row, (details, amount)) in rows.iter().enumerate() {
        let (x, y) = projected[row];
        let entry = buckets
            .entry((details.clone(), assignment[row]))
            .or_insert((0.0, 0.0, 0.0, 0));
        entry.0 += *amount;
        entry.1 += x;
        entry.2 += y;
        entry.3 += 1;
    }

    let aggregates: Vec<ClusterAggregate> = buckets
        .into_iter()
        .map(|((details, cluster), (total, x, y, n))| ClusterAggregate {
            details,
            cluster,
            total_amount: total,
            x: x / n as f32,
            y: y / n as f32,
        })
        .collect();
    debug!(
        "aggregated {} rows into {} (details, cluster) groups",
        rows.len(),
        aggregates.len()
    );
    Ok(aggregates)
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
