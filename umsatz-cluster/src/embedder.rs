//! Embedding-model access for transaction descriptions.
//!
//! The pipeline never owns a model: callers hand in an [`Embedder`], so
//! runs are reproducible and tests can swap in a deterministic stub
//! instead of a network call.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// A sentence-embedding model handle.
pub trait Embedder {
    /// Embed each text into a fixed-dimensional vector, one per input, in
    /// input order. Unit-length normalization is the pipeline's job.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
///
/// The call blocks until the model answers; callers wanting responsiveness
/// wrap it with their own timeout at the boundary.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Embedder for HttpEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().context("embedding request failed")?;
        if !response.status().is_success() {
            bail!("embedding endpoint returned {}", response.status());
        }
        let body: EmbeddingResponse = response.json().context("decoding embedding response")?;
        if body.data.len() != texts.len() {
            bail!(
                "embedding endpoint returned {} vectors for {} inputs",
                body.data.len(),
                texts.len()
            );
        }
        Ok(body.data.into_iter().map(|row| row.embedding).collect())
    }
}
