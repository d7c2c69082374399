//! umsatz-cluster: semantic grouping of transaction descriptions.
//!
//! Embeds free-text transaction details, clusters the embeddings with
//! seeded k-means, projects them to 2-D for exploration, and aggregates
//! amounts per (description, cluster).

pub mod embedder;
pub mod kmeans;
pub mod pipeline;
pub mod projection;

pub use embedder::{Embedder, HttpEmbedder};
pub use kmeans::kmeans;
pub use pipeline::{ClusterAggregate, ClusterConfig, ClusterPartitions, cluster_details};
pub use projection::project_2d;
