//! Embedding layer.
//!
//! The interface is intentionally small so tests can use a deterministic
//! stub without a model backend. The production implementation talks to an
//! OpenAI-compatible `/v1/embeddings` endpoint.

use anyhow::anyhow;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::GistConfig;
use crate::index::error::{GistError, Result};

/// Maps code blocks and queries to fixed-dimension vectors.
#[allow(async_fn_in_trait)]
pub trait Embedder {
    /// Output dimensionality of every produced vector.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per text, order preserved.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>>;
}

/// Embedder backed by an OpenAI-compatible embeddings API.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &GistConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.openai_api_key_secret(),
            base_url: config.openai_base_url.clone(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
        }
    }

    fn api_key(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| {
            GistError::Embedding(anyhow!(
                "OpenAI API key not configured. Run: gist config set-key"
            ))
        })
    }

    async fn request(&self, input: serde_json::Value) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key()?;

        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .json(&serde_json::json!({
                "model": self.model,
                "input": input,
            }))
            .send()
            .await
            .map_err(|e| GistError::Embedding(anyhow::Error::new(e).context("failed to call embeddings API")))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            GistError::Embedding(anyhow::Error::new(e).context("failed to read response body"))
        })?;

        if !status.is_success() {
            return Err(GistError::Embedding(anyhow!(
                "embeddings API error: {status} - {body}"
            )));
        }

        let response: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            GistError::Embedding(
                anyhow::Error::new(e).context("failed to parse embeddings response"),
            )
        })?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(texts = texts.len(), model = %self.model, "embedding batch");
        let vectors = self.request(serde_json::json!(texts)).await?;

        if vectors.len() != texts.len() {
            return Err(GistError::Embedding(anyhow!(
                "embeddings API returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let vectors = self.request(serde_json::json!(query)).await?;

        vectors
            .into_iter()
            .next()
            .ok_or_else(|| GistError::Embedding(anyhow!("no embedding returned")))
    }
}

#[derive(Debug, serde::Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, serde::Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
