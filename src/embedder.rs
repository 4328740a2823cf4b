use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::core::error::{Error, Result};

/// Asymmetric-embedding instruction prefixes (spec.md:164, SHOULD-level):
/// queries and documents are embedded with different fixed prefixes so a
/// model tuned for retrieval can tell the two roles apart.
pub const QUERY_PREFIX: &str = "query: ";
pub const DOCUMENT_PREFIX: &str = "passage: ";

/// Embedding provider contract. Production deployments supply a real
/// model client; this crate only fixes the interface and the retry
/// policy layered on top of it (spec §4.17).
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
    fn dimensions(&self) -> usize;
    /// Identifies the model that produced a vector, persisted alongside
    /// vector snapshots (spec.md:176's `{modelId, dim, count, ...}`).
    fn model_id(&self) -> &str;
}

/// Deterministic hash-based embedder used in tests and examples; not
/// semantically meaningful, only dimensionally and API-correct.
pub struct MockEmbedder {
    dimensions: usize,
    model_id: String,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        MockEmbedder { dimensions, model_id: "mock-embedder-v1".to_string() }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Wraps an `Embedder` with the spec's transient-failure retry policy:
/// exponential backoff starting at 1s, doubling, capped at 10s, up to 3
/// attempts; on exhaustion returns `EmbedderUnavailable` so callers can
/// disable the semantic layer for that query.
pub struct RetryingEmbedder<E> {
    inner: E,
}

impl<E: Embedder> RetryingEmbedder<E> {
    pub fn new(inner: E) -> Self {
        RetryingEmbedder { inner }
    }

    pub async fn embed_with_retry(&self, text: &str) -> Result<Vec<f32>> {
        let mut delay = Duration::from_secs(1);
        let max_attempts = 3;

        for attempt in 1..=max_attempts {
            match self.inner.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, error = %e, "embedder call failed, retrying");
                    sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(10));
                }
                Err(e) => {
                    return Err(Error::embedder_unavailable(format!(
                        "embedder failed after {max_attempts} attempts: {e}"
                    )))
                }
            }
        }
        unreachable!("loop always returns within max_attempts")
    }
}

#[async_trait]
impl<E: Embedder> Embedder for RetryingEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embedder_produces_unit_vectors() {
        let embedder = MockEmbedder::new(8);
        let vector = embedder.embed("hello world").await.unwrap();
        assert_eq!(vector.len(), 8);
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5 || norm == 0.0);
    }

    struct AlwaysFails;

    #[async_trait]
    impl Embedder for AlwaysFails {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::embedder_unavailable("simulated failure"))
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn model_id(&self) -> &str {
            "always-fails"
        }
    }

    #[tokio::test]
    async fn retry_exhaustion_surfaces_embedder_unavailable() {
        let retrying = RetryingEmbedder::new(AlwaysFails);
        let err = retrying.embed_with_retry("x").await.unwrap_err();
        assert!(err.is_kind(crate::core::error::ErrorKind::EmbedderUnavailable));
    }
}
