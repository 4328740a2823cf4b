use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{Error, Result};
use crate::graph::store::GraphStore;

/// A ranked vector match.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub name: String,
    pub score: f32,
}

/// `cosine(a,b) = (a·b) / (|a||b|)`, clamped to `[-1, 1]`; zero-magnitude
/// vectors score 0 (spec §4.5).
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::vector_dimension(format!(
            "vector dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (mag_a * mag_b)).clamp(-1.0, 1.0))
}

pub trait VectorStore: Send + Sync {
    fn add(&mut self, name: &str, vector: Vec<f32>) -> Result<()>;
    fn remove(&mut self, name: &str) -> Result<()>;
    fn get(&self, name: &str) -> Option<Vec<f32>>;
    fn has(&self, name: &str) -> bool;
    fn size(&self) -> usize;
    /// Brute-force top-k by cosine similarity, `O(N·d)`.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<VectorMatch>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    vectors: HashMap<String, Vec<f32>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        InMemoryVectorStore::default()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn add(&mut self, name: &str, vector: Vec<f32>) -> Result<()> {
        self.vectors.insert(name.to_string(), vector);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.vectors.remove(name);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<Vec<f32>> {
        self.vectors.get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    fn size(&self) -> usize {
        self.vectors.len()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        let mut scored = Vec::with_capacity(self.vectors.len());
        for (name, vector) in &self.vectors {
            scored.push(VectorMatch { name: name.clone(), score: cosine(query, vector)? });
        }
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// A single vector quantized to `int8` with a per-vector `scale`, per
/// spec §4.5: `scale = max(|v|) / 127`.
#[derive(Debug, Clone)]
struct QuantizedVector {
    values: Vec<i8>,
    scale: f32,
}

impl QuantizedVector {
    fn quantize(vector: &[f32]) -> Self {
        let max_abs = vector.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
        let scale = if max_abs == 0.0 { 1.0 } else { max_abs / 127.0 };
        let values = vector
            .iter()
            .map(|v| (v / scale).round().clamp(-127.0, 127.0) as i8)
            .collect();
        QuantizedVector { values, scale }
    }

    fn dequantize(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32 * self.scale).collect()
    }
}

/// Scalar-quantized variant, trading ~4x memory for a small cosine-error
/// bound (spec §4.5 requires ≤2% mean absolute error on unit vectors).
#[derive(Debug, Clone, Default)]
pub struct QuantizedVectorStore {
    vectors: HashMap<String, QuantizedVector>,
}

impl QuantizedVectorStore {
    pub fn new() -> Self {
        QuantizedVectorStore::default()
    }
}

impl VectorStore for QuantizedVectorStore {
    fn add(&mut self, name: &str, vector: Vec<f32>) -> Result<()> {
        self.vectors.insert(name.to_string(), QuantizedVector::quantize(&vector));
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.vectors.remove(name);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<Vec<f32>> {
        self.vectors.get(name).map(|q| q.dequantize())
    }

    fn has(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    fn size(&self) -> usize {
        self.vectors.len()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        let mut scored = Vec::with_capacity(self.vectors.len());
        for (name, quantized) in &self.vectors {
            let dequantized = quantized.dequantize();
            scored.push(VectorMatch { name: name.clone(), score: cosine(query, &dequantized)? });
        }
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Mirrors every mutation to the `GraphStore` and reloads the full set at
/// `initialize()`, so restarts do not require re-embedding (spec §4.5).
pub struct PersistentVectorStore {
    inner: InMemoryVectorStore,
    graph_store: Arc<dyn GraphStore>,
    model: String,
}

impl PersistentVectorStore {
    pub fn new(graph_store: Arc<dyn GraphStore>, model: impl Into<String>) -> Self {
        PersistentVectorStore {
            inner: InMemoryVectorStore::new(),
            graph_store,
            model: model.into(),
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        for (name, vector) in self.graph_store.load_all_embeddings()? {
            self.inner.add(&name, vector)?;
        }
        Ok(())
    }
}

impl VectorStore for PersistentVectorStore {
    fn add(&mut self, name: &str, vector: Vec<f32>) -> Result<()> {
        self.graph_store.store_embedding(name, &vector, &self.model)?;
        self.inner.add(name, vector)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.graph_store.remove_embedding(name)?;
        self.inner.remove(name)
    }

    fn get(&self, name: &str) -> Option<Vec<f32>> {
        self.inner.get(name)
    }

    fn has(&self, name: &str) -> bool {
        self.inner.has(name)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        self.inner.search(query, k)
    }
}

/// Storage-type tag the factory dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorStoreKind {
    InMemory,
    Quantized,
    Persistent,
}

pub fn build_vector_store(
    kind: VectorStoreKind,
    graph_store: Option<Arc<dyn GraphStore>>,
    model: &str,
) -> Result<Box<dyn VectorStore>> {
    match kind {
        VectorStoreKind::InMemory => Ok(Box::new(InMemoryVectorStore::new())),
        VectorStoreKind::Quantized => Ok(Box::new(QuantizedVectorStore::new())),
        VectorStoreKind::Persistent => {
            let store = graph_store.ok_or_else(|| {
                Error::validation("persistent vector store requires a GraphStore")
            })?;
            let mut vs = PersistentVectorStore::new(store, model);
            vs.initialize()?;
            Ok(Box::new(vs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_matches_known_value() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine(&a, &b).unwrap() - 0.0).abs() < 1e-6);
        let c = vec![1.0, 1.0];
        assert!((cosine(&a, &c).unwrap() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn cosine_rejects_dimension_mismatch() {
        let err = cosine(&[1.0, 0.0], &[1.0]).unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::VectorDimension);
    }

    #[test]
    fn zero_magnitude_scores_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn in_memory_store_search_ranks_by_similarity() {
        let mut store = InMemoryVectorStore::new();
        store.add("a", vec![1.0, 0.0]).unwrap();
        store.add("b", vec![0.0, 1.0]).unwrap();
        let results = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].name, "a");
    }

    #[test]
    fn quantization_error_is_within_bound() {
        let mut rng_state: u64 = 42;
        let mut next = || {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng_state >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        };

        let mut total_error = 0.0;
        let trials = 200;
        for _ in 0..trials {
            let dim = 32;
            let a: Vec<f32> = (0..dim).map(|_| next()).collect();
            let b: Vec<f32> = (0..dim).map(|_| next()).collect();
            let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
            let (na, nb) = (norm(&a), norm(&b));
            let a: Vec<f32> = a.iter().map(|x| x / na).collect();
            let b: Vec<f32> = b.iter().map(|x| x / nb).collect();

            let exact = cosine(&a, &b).unwrap();
            let qa = QuantizedVector::quantize(&a).dequantize();
            let qb = QuantizedVector::quantize(&b).dequantize();
            let approx = cosine(&qa, &qb).unwrap();
            total_error += (exact - approx).abs();
        }
        assert!(total_error / trials as f32 <= 0.02);
    }
}
